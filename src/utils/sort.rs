use core::mem;

/// Maps an f64 to a u64 whose unsigned order matches the float order.
/// `-0.0` and `0.0` map to the same key, NaN sorts after everything.
#[inline(always)]
pub fn sortable_bits(x: f64) -> u64 {
    if x.is_nan() {
        return u64::MAX;
    }
    let x = if x == 0.0 { 0.0 } else { x };
    let bits = x.to_bits();
    if bits >> 63 == 1 {
        !bits
    } else {
        bits | (1 << 63)
    }
}

/// Stable u64-key radix sort for SoA (keys/vals).
/// - Sorts by keys ascending
/// - Reorders vals accordingly
///
/// Complexity: 8 passes, each O(n + 256)
pub fn radix_sort_u64_soa<N: Copy + Default>(keys: &mut [u64], vals: &mut [N]) {
    assert_eq!(keys.len(), vals.len());
    let n = keys.len();
    if n <= 1 {
        return;
    }

    if n <= 32 {
        insertion_sort_u64_soa(keys, vals);
        return;
    }

    let mut keys_tmp = vec![0u64; n];
    let mut vals_tmp: Vec<N> = vec![N::default(); n];

    let mut src_keys: &mut [u64] = keys;
    let mut src_vals: &mut [N] = vals;
    let mut dst_keys: &mut [u64] = &mut keys_tmp;
    let mut dst_vals: &mut [N] = &mut vals_tmp;
    let mut in_scratch = false;

    // LSD, byte 0..7
    for shift in (0u32..64).step_by(8) {
        let mut count = [0usize; 256];

        for &k in src_keys.iter() {
            count[((k >> shift) & 0xFF) as usize] += 1;
        }

        // all keys share this byte
        if count.iter().any(|&c| c == n) {
            continue;
        }

        let mut sum = 0usize;
        for c in count.iter_mut() {
            let tmp = *c;
            *c = sum;
            sum += tmp;
        }

        for idx in 0..n {
            let k = src_keys[idx];
            let b = ((k >> shift) & 0xFF) as usize;
            let pos = count[b];
            count[b] = pos + 1;
            dst_keys[pos] = k;
            dst_vals[pos] = src_vals[idx];
        }

        mem::swap(&mut src_keys, &mut dst_keys);
        mem::swap(&mut src_vals, &mut dst_vals);
        in_scratch = !in_scratch;
    }

    // skipped passes can leave the result in the scratch buffers
    if in_scratch {
        dst_keys.copy_from_slice(src_keys);
        dst_vals.copy_from_slice(src_vals);
    }
}

/// Tiny insertion sort for small n (SoA).
#[inline(always)]
fn insertion_sort_u64_soa<N: Copy>(keys: &mut [u64], vals: &mut [N]) {
    let n = keys.len();
    for i in 1..n {
        let mut j = i;
        while j > 0 && keys[j] < keys[j - 1] {
            keys.swap(j, j - 1);
            vals.swap(j, j - 1);
            j -= 1;
        }
    }
}

/// Positions of `keys` in stable ascending order.
pub fn stable_argsort(keys: &[f64]) -> Vec<usize> {
    let mut bits: Vec<u64> = keys.iter().map(|&k| sortable_bits(k)).collect();
    let mut order: Vec<usize> = (0..keys.len()).collect();
    radix_sort_u64_soa(&mut bits, &mut order);
    order
}
