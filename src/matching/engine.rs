/// One row of a matching: a pair, or a record present on a single side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedPair<T> {
    pub left: Option<T>,
    pub right: Option<T>,
}

impl<T> MatchedPair<T> {
    pub fn is_matched(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

/// Greedily pair two lists of records by descending score.
///
/// Every left/right combination is scored and the combinations are sorted by
/// score, highest first (stable, so input order breaks ties). A combination is
/// accepted when neither record has been placed yet. A combination scoring 0
/// places its left record without a partner. Records still unplaced afterwards
/// are appended as left-only, then right-only rows.
///
/// Every input record appears in exactly one row of the result.
pub fn match_records<T, F>(left: &[T], right: &[T], mut score: F) -> Vec<MatchedPair<T>>
where
    T: Copy,
    F: FnMut(T, T) -> u32,
{
    let mut scored = Vec::with_capacity(left.len() * right.len());
    for (i, &l) in left.iter().enumerate() {
        for (j, &r) in right.iter().enumerate() {
            scored.push((i, j, score(l, r)));
        }
    }
    scored.sort_by(|a, b| b.2.cmp(&a.2));

    let mut left_placed = vec![false; left.len()];
    let mut right_placed = vec![false; right.len()];
    let mut result = Vec::with_capacity(left.len() + right.len());

    for (i, j, s) in scored {
        if left_placed[i] || right_placed[j] {
            continue;
        }
        left_placed[i] = true;
        if s > 0 {
            right_placed[j] = true;
            result.push(MatchedPair {
                left: Some(left[i]),
                right: Some(right[j]),
            });
        } else {
            result.push(MatchedPair {
                left: Some(left[i]),
                right: None,
            });
        }
    }

    for (i, &l) in left.iter().enumerate() {
        if !left_placed[i] {
            result.push(MatchedPair {
                left: Some(l),
                right: None,
            });
        }
    }
    for (j, &r) in right.iter().enumerate() {
        if !right_placed[j] {
            result.push(MatchedPair {
                left: None,
                right: Some(r),
            });
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closeness(a: i32, b: i32) -> u32 {
        10u32.saturating_sub(a.abs_diff(b))
    }

    fn appears_once<T: Copy + PartialEq>(rows: &[MatchedPair<T>], left: &[T], right: &[T]) {
        for l in left {
            assert_eq!(rows.iter().filter(|p| p.left == Some(*l)).count(), 1);
        }
        for r in right {
            assert_eq!(rows.iter().filter(|p| p.right == Some(*r)).count(), 1);
        }
    }

    #[test]
    fn test_best_pairs_win() {
        let left = [1, 20, 40];
        let right = [41, 2, 19];
        let rows = match_records(&left, &right, closeness);
        assert_eq!(
            rows,
            vec![
                MatchedPair { left: Some(1), right: Some(2) },
                MatchedPair { left: Some(20), right: Some(19) },
                MatchedPair { left: Some(40), right: Some(41) },
            ]
        );
    }

    #[test]
    fn test_leftovers_are_one_sided() {
        let left = [1, 100];
        let right = [2, 200, 300];
        let rows = match_records(&left, &right, closeness);

        assert_eq!(rows.iter().filter(|p| p.is_matched()).count(), 1);
        assert!(rows.contains(&MatchedPair { left: Some(1), right: Some(2) }));
        assert!(rows.contains(&MatchedPair { left: Some(100), right: None }));
        assert!(rows.contains(&MatchedPair { left: None, right: Some(200) }));
        assert!(rows.contains(&MatchedPair { left: None, right: Some(300) }));
        appears_once(&rows, &left, &right);
    }

    #[test]
    fn test_zero_score_places_left_only() {
        let rows = match_records(&[5], &[500], closeness);
        assert_eq!(
            rows,
            vec![
                MatchedPair { left: Some(5), right: None },
                MatchedPair { left: None, right: Some(500) },
            ]
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let rows = match_records(&[1, 2], &[7, 8], |_, _| 3);
        assert_eq!(rows[0], MatchedPair { left: Some(1), right: Some(7) });
        assert_eq!(rows[1], MatchedPair { left: Some(2), right: Some(8) });
    }

    #[test]
    fn test_empty_sides() {
        let empty: [i32; 0] = [];
        assert!(match_records(&empty, &empty, closeness).is_empty());
        let rows = match_records(&[1, 2], &empty, closeness);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|p| p.right.is_none()));
        let rows = match_records(&empty, &[3], closeness);
        assert_eq!(rows, vec![MatchedPair { left: None, right: Some(3) }]);
    }

    #[test]
    fn test_every_record_appears_once() {
        let left = [3, 9, 15, 22, 22, 40];
        let right = [4, 14, 14, 30, 41, 90, 91];
        let rows = match_records(&left, &right, closeness);
        assert_eq!(rows.len(), left.len() + right.len() - rows.iter().filter(|p| p.is_matched()).count());
        let placed_left = rows.iter().filter(|p| p.left.is_some()).count();
        let placed_right = rows.iter().filter(|p| p.right.is_some()).count();
        assert_eq!(placed_left, left.len());
        assert_eq!(placed_right, right.len());
    }
}
