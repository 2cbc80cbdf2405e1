//! Combinatorial numbering systems that map cube sub-states to dense integer
//! ranges and back. Every function here is O(n) in the number of pieces.

/// Binomial coefficients `C(n, k)` for `n, k <= 12`.
const CHOOSE: [[u16; 13]; 13] = {
    let mut arr = [[0; 13]; 13];
    let mut n = 0;
    while n < arr.len() {
        arr[n][0] = 1;
        let mut k = 1;
        while k <= n {
            arr[n][k] = arr[n - 1][k - 1] + arr[n - 1][k];
            k += 1;
        }
        n += 1;
    }
    arr
};

/// Nibble `s` holds the rank of symbol `s` among the symbols not yet
/// consumed. Consuming a symbol decrements every nibble above it.
const IDENTITY_REGISTER: u64 = 0xFEDC_BA98_7654_3210;

/// `C(n, k)`, zero when `k > n`.
///
/// # Panics
///
/// Panics if `n > 12`.
#[must_use]
pub const fn choose(n: usize, k: usize) -> u16 {
    if k > n { 0 } else { CHOOSE[n][k] }
}

/// The Lehmer code of a permutation of `0..perm.len()`, with the first
/// position as the most significant digit. Supports up to 16 symbols.
#[must_use]
pub fn permutation_index(perm: &[u8]) -> u64 {
    debug_assert!(perm.len() <= 16);
    let n = perm.len() as u64;
    let mut register = IDENTITY_REGISTER;
    let mut index = 0;
    for (i, &symbol) in perm.iter().take(perm.len().saturating_sub(1)).enumerate() {
        let shift = u64::from(symbol) << 2;
        index = (n - i as u64) * index + ((register >> shift) & 0xF);
        register -= 0x1111_1111_1111_1110 << shift;
    }
    index
}

/// Inverse of [`permutation_index`]: overwrites `perm` with the permutation
/// of `0..perm.len()` that has the given index.
pub fn set_permutation(perm: &mut [u8], mut index: u64) {
    debug_assert!(perm.len() <= 16);
    let Some((last, head)) = perm.split_last_mut() else {
        return;
    };
    // Mixed-radix digits, the first position's digit in the lowest nibble
    let mut digits = 0;
    for radix in 2..=head.len() as u64 + 1 {
        digits = (digits << 4) | (index % radix);
        index /= radix;
    }
    let mut register = IDENTITY_REGISTER;
    for slot in head {
        let shift = (digits & 0xF) << 2;
        digits >>= 4;
        *slot = ((register >> shift) & 0xF) as u8;
        let low = (1 << shift) - 1;
        register = (register & low) | ((register >> 4) & !low);
    }
    *last = (register & 0xF) as u8;
}

/// Whether the permutation with Lehmer index `index` over `n` symbols is
/// odd, read off the mixed-radix digits without decoding it.
#[must_use]
pub fn index_is_odd(mut index: u64, n: usize) -> bool {
    let mut parity = 0;
    for radix in 2..=n as u64 {
        parity ^= index % radix;
        index /= radix;
    }
    parity & 1 == 1
}

/// Whether `perm` is an odd permutation.
#[must_use]
pub fn permutation_is_odd(perm: &[u8]) -> bool {
    index_is_odd(permutation_index(perm), perm.len())
}

/// Base-`modulus` number formed by every orientation but the last, which is
/// determined by the others.
#[must_use]
pub fn orientation_index(orientation: &[u8], modulus: u8) -> u16 {
    debug_assert!(!orientation.is_empty());
    orientation[..orientation.len() - 1]
        .iter()
        .fold(0, |index, &o| index * u16::from(modulus) + u16::from(o))
}

/// Inverse of [`orientation_index`]. The last orientation is chosen so the
/// total is a multiple of `modulus`.
pub fn set_orientation(orientation: &mut [u8], mut index: u16, modulus: u8) {
    let Some((last, head)) = orientation.split_last_mut() else {
        return;
    };
    let mut sum = 0;
    for slot in head.iter_mut().rev() {
        *slot = (index % u16::from(modulus)) as u8;
        sum += u16::from(*slot);
        index /= u16::from(modulus);
    }
    let modulus = u16::from(modulus);
    *last = ((modulus - sum % modulus) % modulus) as u8;
}

/// Ranks which positions of `perm` hold the pieces `first_member..n`,
/// ignoring their order. The arrangement with every member at the end ranks
/// zero.
#[must_use]
pub fn subset_index(perm: &[u8], first_member: u8) -> u16 {
    let n = perm.len();
    let mut index = 0;
    let mut seen = 0;
    for (j, &piece) in perm.iter().enumerate().rev() {
        if piece >= first_member {
            index += choose(n - 1 - j, seen + 1);
            seen += 1;
        }
    }
    index
}

/// Inverse of [`subset_index`]. Members and non-members are each placed in
/// ascending order.
pub fn set_subset(perm: &mut [u8], mut index: u16, first_member: u8) {
    let n = perm.len();
    let mut remaining = n - usize::from(first_member);
    let mut next_member = first_member;
    let mut next_other = 0;
    for (j, slot) in perm.iter_mut().enumerate() {
        let rank = choose(n - 1 - j, remaining);
        if remaining > 0 && index >= rank {
            *slot = next_member;
            next_member += 1;
            index -= rank;
            remaining -= 1;
        } else {
            *slot = next_other;
            next_other += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FACT_UNTIL_12;

    fn inversions(perm: &[u8]) -> usize {
        (0..perm.len())
            .flat_map(|i| (i + 1..perm.len()).map(move |j| (i, j)))
            .filter(|&(i, j)| perm[i] > perm[j])
            .count()
    }

    #[test]
    fn test_known_permutation_indices() {
        assert_eq!(permutation_index(&[0, 1, 2, 3, 4]), 0);
        assert_eq!(permutation_index(&[3, 2, 4, 1, 0]), 89);
        assert_eq!(
            permutation_index(&[1, 0, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
            39_916_800
        );
        assert_eq!(permutation_index(&[1, 0, 2, 3, 4]), 24);

        let mut perm = [0; 5];
        set_permutation(&mut perm, 1);
        assert_eq!(perm, [0, 1, 2, 4, 3]);
        set_permutation(&mut perm, 119);
        assert_eq!(perm, [4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_permutation_round_trip() {
        let mut perm = [0; 7];
        for index in 0..u64::from(FACT_UNTIL_12[7]) {
            set_permutation(&mut perm, index);
            assert_eq!(permutation_index(&perm), index);
        }

        let mut perm: Vec<u8> = (0..12).collect();
        for _ in 0..1000 {
            fastrand::shuffle(&mut perm);
            let mut decoded = [0; 12];
            set_permutation(&mut decoded, permutation_index(&perm));
            assert_eq!(decoded.as_slice(), perm.as_slice());
        }

        let mut perm: Vec<u8> = (0..16).collect();
        fastrand::shuffle(&mut perm);
        let mut decoded = [0; 16];
        set_permutation(&mut decoded, permutation_index(&perm));
        assert_eq!(decoded.as_slice(), perm.as_slice());
    }

    #[test]
    fn test_parity_matches_inversion_count() {
        let mut perm: Vec<u8> = (0..12).collect();
        for _ in 0..1000 {
            fastrand::shuffle(&mut perm);
            assert_eq!(permutation_is_odd(&perm), inversions(&perm) % 2 == 1);
        }
    }

    #[test]
    fn test_orientation_round_trip() {
        assert_eq!(orientation_index(&[0, 1, 2, 0, 0], 3), 15);
        let mut orientation = [0; 5];
        set_orientation(&mut orientation, 16, 3);
        assert_eq!(orientation, [0, 1, 2, 1, 2]);

        let mut twist = [0; 8];
        for index in 0..2187 {
            set_orientation(&mut twist, index, 3);
            assert_eq!(twist.iter().map(|&o| u32::from(o)).sum::<u32>() % 3, 0);
            assert_eq!(orientation_index(&twist, 3), index);
        }
        let mut flip = [0; 12];
        for index in 0..2048 {
            set_orientation(&mut flip, index, 2);
            assert_eq!(flip.iter().fold(0, |acc, &o| acc ^ o), 0);
            assert_eq!(orientation_index(&flip, 2), index);
        }
    }

    #[test]
    fn test_subset_round_trip() {
        let solved: Vec<u8> = (0..12).collect();
        assert_eq!(subset_index(&solved, 8), 0);
        assert_eq!(choose(12, 4), 495);

        let mut perm = [0; 12];
        for index in 0..495 {
            set_subset(&mut perm, index, 8);
            assert_eq!(perm.iter().filter(|&&piece| piece >= 8).count(), 4);
            assert_eq!(subset_index(&perm, 8), index);
        }
    }

    #[test]
    fn test_subset_ignores_member_order() {
        let mut perm: Vec<u8> = (0..12).collect();
        for _ in 0..200 {
            fastrand::shuffle(&mut perm);
            let index = subset_index(&perm, 8);
            let mut shuffled = perm.clone();
            let members: Vec<usize> = (0..12).filter(|&i| perm[i] >= 8).collect();
            shuffled[members[0]] = perm[members[1]];
            shuffled[members[1]] = perm[members[0]];
            assert_eq!(subset_index(&shuffled, 8), index);
        }
    }
}
