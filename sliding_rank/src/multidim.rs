//! Ranking along several axes with epsilon groups.
//!
//! The elements are sorted by the value of the first axis. Starting with the first element of the
//! sorted list, all following elements whose value lies within the epsilon of the first one form
//! a group, the next element outside of the epsilon starts a new group. The epsilon is calculated
//! from the value of the first element of each group only. Every group with more than one element
//! is then ranked the same way along the next axis. Groups which are left when all axes are used
//! up cannot be separated further.

use std::fmt;
use std::ops::Range;

use float_ord::FloatOrd;
use getset::Getters;
use log::trace;

type ValueFn<T> = Box<dyn Fn(&T) -> f64 + Send + Sync>;
type EpsilonFn = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// An axis to rank on, made of a value and an epsilon depending on the value.
pub struct Rank<T> {
    name: String,
    value: ValueFn<T>,
    epsilon: EpsilonFn,
}

impl<T> Rank<T> {
    /// Creates a new axis called `name`.
    ///
    /// Two values `a` and `b` belong to the same group if `|a - b| <= |epsilon(a)|`, where `a` is
    /// the smaller value.
    pub fn new<V, E>(name: impl Into<String>, value: V, epsilon: E) -> Self
    where
        V: Fn(&T) -> f64 + Send + Sync + 'static,
        E: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            value: Box::new(value),
            epsilon: Box::new(epsilon),
        }
    }

    /// Returns the name of the axis.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calculates the value of `element` on this axis.
    pub fn value_of(&self, element: &T) -> f64 {
        (self.value)(element)
    }

    /// Calculates the absolute epsilon of a group starting with `value`.
    pub fn epsilon_at(&self, value: f64) -> f64 {
        (self.epsilon)(value).abs()
    }
}

impl<T> fmt::Debug for Rank<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Rank").field("name", &self.name).finish()
    }
}

/// The value of an element on a named axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RankValue {
    /// Name of the axis.
    pub name: String,
    /// Value on the axis.
    pub value: f64,
}

impl fmt::Display for RankValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// An element with the values calculated while ranking it.
///
/// Only the axes needed to separate the element from the others are evaluated, so `values` may
/// be shorter than the list of axes.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct Ranked<T> {
    /// The ranked element.
    element: T,
    /// The values calculated for the element, one per evaluated axis.
    values: Vec<RankValue>,
}

impl<T> Ranked<T> {
    /// Returns the element, dropping its values.
    pub fn into_element(self) -> T {
        self.element
    }

    fn value(&self, level: usize) -> f64 {
        self.values[level].value
    }
}

/// The result of a ranking, best first, together with the groups which could not be separated.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking<T> {
    ranked: Vec<Ranked<T>>,
    groups: Vec<Range<usize>>,
}

impl<T> Ranking<T> {
    /// Returns the number of ranked elements.
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Checks if there are no ranked elements.
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Returns the ranked elements in order.
    pub fn ranked(&self) -> &[Ranked<T>] {
        &self.ranked
    }

    /// Creates an iterator over the elements in order.
    pub fn elements(&self) -> impl Iterator<Item = &T> + '_ {
        self.ranked.iter().map(Ranked::element)
    }

    /// Returns the index ranges of the inseparable groups, in order.
    pub fn group_ranges(&self) -> &[Range<usize>] {
        &self.groups
    }

    /// Creates an iterator over the inseparable groups, in order.
    pub fn groups(&self) -> impl Iterator<Item = &[Ranked<T>]> + '_ {
        self.groups
            .iter()
            .map(move |range| &self.ranked[range.clone()])
    }

    /// Returns the elements in order.
    pub fn into_elements(self) -> Vec<T> {
        self.ranked.into_iter().map(Ranked::into_element).collect()
    }

    /// Returns the elements split into the inseparable groups.
    pub fn into_groups(self) -> Vec<Vec<T>> {
        let mut elements = self.ranked.into_iter().map(Ranked::into_element);
        self.groups
            .iter()
            .map(|range| elements.by_ref().take(range.len()).collect::<Vec<_>>())
            .collect()
    }
}

/// Ranks elements along an ordered list of [`Rank`]s.
pub struct MultiDimRanking<T> {
    ranks: Vec<Rank<T>>,
}

impl<T> MultiDimRanking<T> {
    /// Creates a new ranking using `ranks` in order.
    ///
    /// # Panics
    /// Panics if `ranks` is empty.
    pub fn new(ranks: Vec<Rank<T>>) -> Self {
        assert!(!ranks.is_empty(), "A ranking needs at least one rank");
        Self { ranks }
    }

    /// Returns the axes used for ranking.
    pub fn ranks(&self) -> &[Rank<T>] {
        &self.ranks
    }

    /// Ranks `elements`. Elements which can't be told apart keep their relative order.
    pub fn rank(&self, elements: Vec<T>) -> Ranking<T> {
        let mut ranked = elements
            .into_iter()
            .map(|element| Ranked {
                element,
                values: Vec::with_capacity(self.ranks.len()),
            })
            .collect::<Vec<_>>();
        let mut groups = Vec::new();
        if !ranked.is_empty() {
            self.rank_level(&mut ranked, 0, 0, &mut groups);
        }
        Ranking { ranked, groups }
    }

    /// Ranks `elements` and returns them in order.
    pub fn apply_rank(&self, elements: Vec<T>) -> Vec<T> {
        self.rank(elements).into_elements()
    }

    /// Calculates the values of `element` on all axes.
    pub fn values_of(&self, element: &T) -> Vec<RankValue> {
        self.ranks
            .iter()
            .map(|rank| RankValue {
                name: rank.name.clone(),
                value: rank.value_of(element),
            })
            .collect()
    }

    /// Sorts `ranked` along the rank at `level` and recurses into the epsilon groups. `offset` is
    /// the index of `ranked[0]` in the full list.
    fn rank_level(
        &self,
        ranked: &mut [Ranked<T>],
        offset: usize,
        level: usize,
        groups: &mut Vec<Range<usize>>,
    ) {
        let rank = &self.ranks[level];
        for entry in ranked.iter_mut() {
            let value = rank.value_of(&entry.element);
            debug_assert!(value.is_finite(), "Rank values must be finite");
            entry.values.push(RankValue {
                name: rank.name.clone(),
                value,
            });
        }
        ranked.sort_by_key(|entry| FloatOrd(entry.value(level)));

        let mut start = 0;
        while start < ranked.len() {
            let anchor = ranked[start].value(level);
            let epsilon = rank.epsilon_at(anchor);
            let end = start
                + 1
                + ranked[start + 1..]
                    .iter()
                    .take_while(|entry| (entry.value(level) - anchor).abs() <= epsilon)
                    .count();
            trace!(
                "{}: group {}..{} starting at {} within {}",
                rank.name,
                offset + start,
                offset + end,
                anchor,
                epsilon
            );

            if end - start > 1 && level + 1 < self.ranks.len() {
                self.rank_level(&mut ranked[start..end], offset + start, level + 1, groups);
            } else {
                groups.push(offset + start..offset + end);
            }
            start = end;
        }
    }
}

impl<T> fmt::Debug for MultiDimRanking<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MultiDimRanking")
            .field("ranks", &self.ranks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{MultiDimRanking, Rank, RankValue};

    fn by_value(epsilon: f64) -> MultiDimRanking<i32> {
        MultiDimRanking::new(vec![Rank::new(
            "R1",
            |&value: &i32| value as f64,
            move |_| epsilon,
        )])
    }

    #[test]
    fn separate_groups() {
        let ranking = by_value(0.0).rank(vec![8, 4, 2, 1]);
        assert_eq!(ranking.elements().copied().collect::<Vec<_>>(), vec![1, 2, 4, 8]);
        assert_eq!(ranking.group_ranges().len(), 4);
    }

    #[test]
    fn two_groups() {
        let ranker = by_value(1.0);
        assert_eq!(ranker.apply_rank(vec![2, 1, 5, 4]), vec![1, 2, 4, 5]);
        assert_eq!(
            ranker.rank(vec![2, 1, 5, 4]).into_groups(),
            vec![vec![1, 2], vec![4, 5]]
        );
    }

    #[test]
    fn one_group_is_a_stable_sort() {
        let ranker = MultiDimRanking::new(vec![Rank::new(
            "Tens",
            |&value: &i32| (value / 10) as f64,
            |_| f64::INFINITY,
        )]);
        let ranking = ranker.rank(vec![31, 12, 35, 11, 30]);
        assert_eq!(ranking.group_ranges(), &[0..5]);
        assert_eq!(ranking.into_elements(), vec![12, 11, 31, 35, 30]);
    }

    #[test]
    fn equal_values_keep_their_order() {
        let ranker = MultiDimRanking::new(vec![Rank::new(
            "Parity",
            |&value: &i32| (value % 2) as f64,
            |_| 0.0,
        )]);
        assert_eq!(ranker.apply_rank(vec![5, 4, 3, 2, 1, 0]), vec![4, 2, 0, 5, 3, 1]);
    }

    #[test]
    fn ranking_twice_changes_nothing() {
        let ranker = by_value(2.0);
        let once = ranker.apply_rank(vec![7, -3, 12, 0, -1, 8, 7]);
        assert_eq!(once, vec![-3, -1, 0, 7, 7, 8, 12]);
        assert_eq!(ranker.apply_rank(once.clone()), once);
    }

    #[test]
    fn negative_epsilon_and_values() {
        let ranking = by_value(-1.0).rank(vec![-4, -6, -5, 0]);
        assert_eq!(ranking.into_groups(), vec![vec![-6, -5], vec![-4], vec![0]]);
    }

    #[test]
    fn empty_input() {
        let ranking = by_value(0.0).rank(Vec::new());
        assert!(ranking.is_empty());
        assert_eq!(ranking.groups().count(), 0);
    }

    #[test]
    #[should_panic]
    fn needs_a_rank() {
        MultiDimRanking::<i32>::new(Vec::new());
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Entity {
        value: f64,
        value2: i32,
    }

    fn entity(value: f64, value2: i32) -> Entity {
        Entity { value, value2 }
    }

    #[test]
    fn relative_and_absolute_epsilon() {
        let ranker = MultiDimRanking::new(vec![
            Rank::new("R1", |entity: &Entity| entity.value, |value| value * 0.1),
            Rank::new("R2", |entity: &Entity| entity.value2 as f64, |_| 1.0),
        ]);
        let entities = vec![
            entity(100.0, 2),
            entity(120.0, 7),
            entity(110.0, 3),
            entity(101.0, 5),
            entity(130.0, 6),
        ];

        assert_eq!(
            ranker.apply_rank(entities.clone()),
            vec![
                entity(100.0, 2),
                entity(110.0, 3),
                entity(101.0, 5),
                entity(130.0, 6),
                entity(120.0, 7),
            ]
        );

        let ranking = ranker.rank(entities);
        // 101 is close to 100 on R1 but R2 separates it.
        assert_eq!(ranking.group_ranges(), &[0..2, 2..3, 3..5]);
        assert_eq!(
            ranking.ranked()[2].values(),
            &vec![
                RankValue {
                    name: "R1".to_string(),
                    value: 101.0
                },
                RankValue {
                    name: "R2".to_string(),
                    value: 5.0
                },
            ]
        );
        assert_eq!(
            ranking.into_groups(),
            vec![
                vec![entity(100.0, 2), entity(110.0, 3)],
                vec![entity(101.0, 5)],
                vec![entity(130.0, 6), entity(120.0, 7)],
            ]
        );
    }

    struct Student {
        name: &'static str,
        math: f64,
        english: f64,
        science: f64,
    }

    #[test]
    fn students() {
        let ranker = MultiDimRanking::new(vec![
            Rank::new("math", |student: &Student| student.math, |_| 5.0),
            Rank::new("english", |student: &Student| student.english, |_| 5.0),
            Rank::new("science", |student: &Student| student.science, |_| 5.0),
        ]);
        let students = [
            ("Sara", 80.0, 90.0, 83.0),
            ("Anne", 95.0, 87.0, 92.0),
            ("Rose", 93.0, 85.0, 89.0),
            ("Luke", 82.0, 91.0, 78.0),
            ("Owen", 94.0, 83.0, 94.0),
        ]
        .iter()
        .map(|&(name, math, english, science)| Student {
            name,
            math,
            english,
            science,
        })
        .collect();

        let ranking = ranker.rank(students);
        assert_eq!(
            ranking.elements().map(|student| student.name).collect::<Vec<_>>(),
            vec!["Luke", "Sara", "Rose", "Anne", "Owen"]
        );
        assert_eq!(ranking.group_ranges(), &[0..2, 2..5]);
        assert_eq!(ranking.ranked()[0].values().len(), 3);

        let values = ranker.values_of(ranking.ranked()[4].element());
        assert_eq!(
            values.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["math=94", "english=83", "science=94"]
        );
    }
}
