//! Largest-remainder split of a target across buckets.

/// Split `target` across buckets of the given `sizes` proportionally
///
/// Each bucket first gets the floor of its exact share; the leftover goes one
/// by one to the largest fractional remainders (lower position first on
/// ties). No bucket receives more than its size and the shares sum to
/// `min(target, sum(sizes))`.
pub fn allocate_proportional(sizes: &[usize], target: usize) -> Vec<usize> {
    let total: usize = sizes.iter().sum();
    if total == 0 {
        return vec![0; sizes.len()];
    }
    let target = target.min(total);

    let mut shares = Vec::with_capacity(sizes.len());
    let mut remainders = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let scaled = size as u128 * target as u128;
        shares.push((scaled / total as u128) as usize);
        remainders.push(scaled % total as u128);
    }

    let mut leftover = target - shares.iter().sum::<usize>();
    while leftover > 0 {
        let mut order: Vec<usize> = (0..sizes.len())
            .filter(|&bucket| shares[bucket] < sizes[bucket])
            .collect();
        if order.is_empty() {
            break;
        }
        order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]).then(a.cmp(&b)));

        for bucket in order.into_iter().take(leftover) {
            shares[bucket] += 1;
            remainders[bucket] = 0;
            leftover -= 1;
        }
    }

    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_proportions_need_no_rounding() {
        assert_eq!(allocate_proportional(&[8, 4], 6), vec![4, 2]);
    }

    #[test]
    fn leftover_goes_to_largest_remainder() {
        // exact shares: 3.33, 1.67
        assert_eq!(allocate_proportional(&[8, 4], 5), vec![3, 2]);
    }

    #[test]
    fn ties_go_to_earlier_bucket() {
        assert_eq!(allocate_proportional(&[1, 1, 1], 2), vec![1, 1, 0]);
    }

    #[test]
    fn shares_never_exceed_bucket_size() {
        let sizes = [1, 50, 2];
        let shares = allocate_proportional(&sizes, 53);
        assert_eq!(shares, vec![1, 50, 2]);

        let shares = allocate_proportional(&sizes, 100);
        assert_eq!(shares, vec![1, 50, 2]);
    }

    #[test]
    fn shares_sum_to_target() {
        let sizes = [13, 7, 29, 1, 50];
        for target in 0..=100 {
            let shares = allocate_proportional(&sizes, target);
            assert_eq!(shares.iter().sum::<usize>(), target);
            assert!(shares.iter().zip(&sizes).all(|(share, size)| share <= size));
        }
    }

    #[test]
    fn empty_buckets_get_nothing() {
        assert_eq!(allocate_proportional(&[], 5), Vec::<usize>::new());
        assert_eq!(allocate_proportional(&[0, 0], 5), vec![0, 0]);
        assert_eq!(allocate_proportional(&[0, 4], 2), vec![0, 2]);
    }
}
