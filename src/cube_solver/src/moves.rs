use itertools::Itertools;
use std::fmt;

/// A face-turn axis, in the fixed order U R F D L B. `axis + 3` is the
/// opposite face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    U,
    R,
    F,
    D,
    L,
    B,
}

impl Axis {
    pub const ALL: [Axis; 6] = [Axis::U, Axis::R, Axis::F, Axis::D, Axis::L, Axis::B];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::ALL[(self.index() + 3) % 6]
    }

    /// Whether a turn on `self` may follow a turn on `last` in canonical
    /// search order. Same-axis pairs are redundant and an opposite pair is
    /// only searched with the U, R or F face first.
    #[must_use]
    pub fn may_follow(self, last: Option<Axis>) -> bool {
        match last {
            None => true,
            Some(last) => self != last && self.index() + 3 != last.index(),
        }
    }

    #[must_use]
    pub const fn name(self) -> char {
        match self {
            Axis::U => 'U',
            Axis::R => 'R',
            Axis::F => 'F',
            Axis::D => 'D',
            Axis::L => 'L',
            Axis::B => 'B',
        }
    }
}

/// A face turn, encoded as `axis * 3 + (power - 1)` where power 1 is a
/// clockwise quarter turn, 2 a half turn and 3 a counterclockwise quarter
/// turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move(u8);

impl Move {
    pub const COUNT: usize = 18;

    pub const U: Move = Move::new(Axis::U, 1);
    pub const U2: Move = Move::new(Axis::U, 2);
    pub const U_PRIME: Move = Move::new(Axis::U, 3);
    pub const R: Move = Move::new(Axis::R, 1);
    pub const R2: Move = Move::new(Axis::R, 2);
    pub const R_PRIME: Move = Move::new(Axis::R, 3);
    pub const F: Move = Move::new(Axis::F, 1);
    pub const F2: Move = Move::new(Axis::F, 2);
    pub const F_PRIME: Move = Move::new(Axis::F, 3);
    pub const D: Move = Move::new(Axis::D, 1);
    pub const D2: Move = Move::new(Axis::D, 2);
    pub const D_PRIME: Move = Move::new(Axis::D, 3);
    pub const L: Move = Move::new(Axis::L, 1);
    pub const L2: Move = Move::new(Axis::L, 2);
    pub const L_PRIME: Move = Move::new(Axis::L, 3);
    pub const B: Move = Move::new(Axis::B, 1);
    pub const B2: Move = Move::new(Axis::B, 2);
    pub const B_PRIME: Move = Move::new(Axis::B, 3);

    /// # Panics
    ///
    /// Panics if `power` is not 1, 2 or 3.
    #[must_use]
    pub const fn new(axis: Axis, power: u8) -> Self {
        assert!(power >= 1 && power <= 3, "move power must be 1, 2 or 3");
        Move(axis as u8 * 3 + power - 1)
    }

    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        if (id as usize) < Self::COUNT {
            Some(Move(id))
        } else {
            None
        }
    }

    /// Every move with an axis among the first `axes` axes, in id order.
    pub fn all(axes: usize) -> impl Iterator<Item = Move> {
        (0..(axes * 3) as u8).map(Move)
    }

    #[must_use]
    pub const fn id(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn axis(self) -> Axis {
        Axis::ALL[self.0 as usize / 3]
    }

    #[must_use]
    pub const fn power(self) -> u8 {
        self.0 % 3 + 1
    }

    #[must_use]
    pub const fn inverse(self) -> Self {
        Move(self.0 / 3 * 3 + 2 - self.0 % 3)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.power() {
            1 => "",
            2 => "2",
            _ => "'",
        };
        write!(f, "{}{suffix}", self.axis().name())
    }
}

/// An ordered, immutable list of moves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MoveSequence(Vec<Move>);

impl MoveSequence {
    #[must_use]
    pub fn new(moves: Vec<Move>) -> Self {
        MoveSequence(moves)
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.0.iter().copied()
    }

    /// The move ids, the form handed to notation formatters.
    #[must_use]
    pub fn ids(&self) -> Vec<u8> {
        self.iter().map(Move::id).collect()
    }

    /// The sequence that undoes this one: reversed, with every move inverted.
    /// Inverting a solving sequence yields a sequence that scrambles the
    /// solved state into the original position.
    #[must_use]
    pub fn inverse(&self) -> Self {
        self.0.iter().rev().map(|move_| move_.inverse()).collect()
    }
}

impl FromIterator<Move> for MoveSequence {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        MoveSequence(iter.into_iter().collect())
    }
}

impl IntoIterator for MoveSequence {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MoveSequence {
    type Item = Move;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Move>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl fmt::Display for MoveSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_encoding() {
        assert_eq!(Move::U.id(), 0);
        assert_eq!(Move::R2.id(), 4);
        assert_eq!(Move::B_PRIME.id(), 17);
        for move_ in Move::all(6) {
            assert_eq!(Move::new(move_.axis(), move_.power()), move_);
            assert_eq!(move_.inverse().axis(), move_.axis());
            assert_eq!(move_.inverse().power(), 4 - move_.power());
            assert_eq!(move_.inverse().inverse(), move_);
        }
        assert_eq!(Move::all(3).count(), 9);
        assert_eq!(Move::from_id(18), None);
    }

    #[test]
    fn test_axis_order_restriction() {
        assert!(Axis::U.may_follow(None));
        assert!(!Axis::U.may_follow(Some(Axis::U)));
        assert!(Axis::D.may_follow(Some(Axis::U)));
        assert!(!Axis::U.may_follow(Some(Axis::D)));
        assert!(Axis::R.may_follow(Some(Axis::D)));
        assert_eq!(Axis::L.opposite(), Axis::R);
    }

    #[test]
    fn test_sequence_inverse_and_display() {
        let sequence = MoveSequence::new(vec![Move::R, Move::U2, Move::F_PRIME]);
        assert_eq!(sequence.to_string(), "R U2 F'");
        assert_eq!(sequence.inverse().to_string(), "F U2 R'");
        assert_eq!(sequence.ids(), vec![3, 1, 8]);
        assert_eq!(sequence.len(), 3);
        assert!(MoveSequence::default().is_empty());
    }
}
