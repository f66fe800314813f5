//! A fixed-size real vector that keeps its Euclidean norm current.

use std::fmt;
use std::ops::Index;

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::error::{check_len, Error, Result};

/// An ordered, fixed-length sequence of coordinates.
///
/// The size never changes after construction, and `length()` is recomputed
/// on every coordinate write, so it always equals the norm of the current
/// coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Vector {
    coordinates: Vec<f64>,
    length: f64,
}

impl Vector {
    /// Creates a vector from an explicit list of coordinates.
    pub fn new(coordinates: Vec<f64>) -> Self {
        let length = norm(&coordinates);
        Vector {
            coordinates,
            length,
        }
    }

    /// A vector of `size` zeros.
    pub fn zero(size: usize) -> Self {
        Vector {
            coordinates: vec![0.0; size],
            length: 0.0,
        }
    }

    /// A vector of `size` ones.
    pub fn ones(size: usize) -> Self {
        Vector::new(vec![1.0; size])
    }

    /// A vector whose coordinates are drawn independently and uniformly from
    /// `[min, max)`.
    pub fn random_uniform<R: Rng + ?Sized>(
        size: usize,
        min: f64,
        max: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if !(min < max) {
            return Err(Error::InvalidConfig(format!(
                "empty sampling interval [{}, {})",
                min, max
            )));
        }
        let range = Uniform::new(min, max);
        Ok(Vector::new(
            (0..size).map(|_| range.sample(rng)).collect(),
        ))
    }

    /// Returns true if every coordinate is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.coordinates.iter().all(|&c| c == 0.0)
    }

    pub fn size(&self) -> usize {
        self.coordinates.len()
    }

    /// The Euclidean norm of the vector.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.coordinates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.coordinates.iter()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.coordinates
    }

    /// Replaces the coordinate at `index` and refreshes the norm.
    ///
    /// Panics if `index` is out of bounds, like slice indexing.
    pub fn set(&mut self, index: usize, value: f64) {
        self.coordinates[index] = value;
        self.length = norm(&self.coordinates);
    }

    /// Adds `delta` to the coordinate at `index` and refreshes the norm.
    pub fn add_at(&mut self, index: usize, delta: f64) {
        let value = self.coordinates[index] + delta;
        self.set(index, value);
    }

    /// Rewrites every coordinate as `f(index, value)`, refreshing the norm
    /// once all writes are done.
    pub fn update_each<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, f64) -> f64,
    {
        for (i, c) in self.coordinates.iter_mut().enumerate() {
            *c = f(i, *c);
        }
        self.length = norm(&self.coordinates);
    }

    /// Scales the vector to unit length in place. The zero vector is left
    /// untouched.
    pub fn normalize(&mut self) {
        if self.is_zero() {
            return;
        }
        let length = self.length;
        for c in &mut self.coordinates {
            *c /= length;
        }
        self.length = norm(&self.coordinates);
    }

    /// Copies out the coordinates `from..=to`.
    pub fn slice(&self, from: usize, to: usize) -> Result<Vec<f64>> {
        if from > to || to >= self.size() {
            return Err(Error::InvalidRange {
                from,
                to,
                size: self.size(),
            });
        }
        Ok(self.coordinates[from..=to].to_vec())
    }

    /// Returns a copy of the vector with every coordinate multiplied by `c`.
    pub fn scale(&self, c: f64) -> Vector {
        Vector::new(self.coordinates.iter().map(|x| x * c).collect())
    }

    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn subtract(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, |a, b| a - b)
    }

    /// The scalar product of two vectors of equal size.
    pub fn dot(&self, other: &Vector) -> Result<f64> {
        check_len(self.size(), other.size())?;
        Ok(self
            .coordinates
            .iter()
            .zip(&other.coordinates)
            .map(|(a, b)| a * b)
            .sum())
    }

    fn zip_with<F>(&self, other: &Vector, f: F) -> Result<Vector>
    where
        F: Fn(f64, f64) -> f64,
    {
        check_len(self.size(), other.size())?;
        Ok(Vector::new(
            self.coordinates
                .iter()
                .zip(&other.coordinates)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        ))
    }
}

fn norm(coordinates: &[f64]) -> f64 {
    coordinates.iter().map(|c| c * c).sum::<f64>().sqrt()
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.coordinates[index]
    }
}

impl From<Vec<f64>> for Vector {
    fn from(coordinates: Vec<f64>) -> Self {
        Vector::new(coordinates)
    }
}

impl<'a> From<&'a [f64]> for Vector {
    fn from(coordinates: &'a [f64]) -> Self {
        Vector::new(coordinates.to_vec())
    }
}

impl AsRef<[f64]> for Vector {
    fn as_ref(&self) -> &[f64] {
        &self.coordinates
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, c) in self.coordinates.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn v(c: &[f64]) -> Vector {
        Vector::from(c)
    }

    #[test]
    fn add_and_dot() {
        let a = v(&[1.0, 2.0, 3.0]);
        let b = v(&[4.0, 5.0, 6.0]);
        assert_eq!(a.add(&b).unwrap(), v(&[5.0, 7.0, 9.0]));
        assert_eq!(a.dot(&b).unwrap(), 32.0);
        assert_eq!(b.dot(&a).unwrap(), 32.0);
    }

    #[test]
    fn subtract_undoes_add() {
        let a = v(&[0.1, -2.5, 3.75]);
        let b = v(&[4.2, 5.0, -6.1]);
        let back = a.add(&b).unwrap().subtract(&b).unwrap();
        for (x, y) in back.iter().zip(a.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn mismatched_sizes() {
        let a = v(&[1.0, 2.0]);
        let b = v(&[1.0, 2.0, 3.0]);
        assert!(a.add(&b).is_err());
        assert!(a.subtract(&b).is_err());
        match a.dot(&b) {
            Err(Error::DimensionMismatch { expected, found }) => {
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn length_tracks_writes() {
        let mut a = Vector::zero(3);
        assert_eq!(a.length(), 0.0);
        a.set(0, 3.0);
        assert_abs_diff_eq!(a.length(), 3.0);
        a.set(2, 4.0);
        assert_abs_diff_eq!(a.length(), 5.0);
        a.add_at(1, 12.0);
        assert_abs_diff_eq!(a.length(), 13.0);
        a.set(0, -1.5);
        let expected = norm(a.as_slice());
        assert_abs_diff_eq!(a.length(), expected, epsilon = 1e-12);
    }

    #[test]
    fn update_each_refreshes_length() {
        let mut a = v(&[1.0, 1.0]);
        a.update_each(|i, c| c * (i as f64 + 3.0));
        assert_eq!(a.as_slice(), &[3.0, 4.0]);
        assert_abs_diff_eq!(a.length(), 5.0);
    }

    #[test]
    fn normalize() {
        let mut a = v(&[3.0, 0.0, 4.0]);
        a.normalize();
        assert_abs_diff_eq!(a[0], 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(a[2], 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(a.length(), 1.0, epsilon = 1e-12);
        a.normalize();
        assert_abs_diff_eq!(a[0], 0.6, epsilon = 1e-12);

        let mut z = Vector::zero(4);
        z.normalize();
        assert!(z.is_zero());
        assert_eq!(z.length(), 0.0);
    }

    #[test]
    fn zero_and_ones() {
        for n in 0..5 {
            assert!(Vector::zero(n).is_zero());
        }
        let e = Vector::ones(4);
        assert_eq!(e.as_slice(), &[1.0; 4]);
        assert_abs_diff_eq!(e.length(), 2.0);
        assert!(!e.is_zero());
    }

    #[test]
    fn slice() {
        let a = v(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.slice(1, 3).unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(a.slice(4, 4).unwrap(), vec![4.0]);
        assert_eq!(a.slice(0, 4).unwrap().len(), 5);
        assert!(a.slice(3, 2).is_err());
        assert!(a.slice(0, 5).is_err());
        assert!(Vector::zero(0).slice(0, 0).is_err());
    }

    #[test]
    fn scale_copies() {
        let a = v(&[1.0, -2.0]);
        let b = a.scale(3.0);
        assert_eq!(b, v(&[3.0, -6.0]));
        assert_eq!(a, v(&[1.0, -2.0]));
    }

    #[test]
    fn random_uniform_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = Vector::random_uniform(100, -0.5, 0.25, &mut rng).unwrap();
        assert_eq!(a.size(), 100);
        assert!(a.iter().all(|&c| c >= -0.5 && c < 0.25));
        assert!(Vector::random_uniform(3, 1.0, 1.0, &mut rng).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(v(&[1.0, 2.5]).to_string(), "{1; 2.5}");
    }
}
