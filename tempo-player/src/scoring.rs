//! The scoring function: one [`FeatureBuffer`] in, one scalar out.

use crate::features::{FeatureBuffer, FEATURE_LEN};
use derive_more::{Display, Error, From};
use ndarray::{s, Array1};
use ndarray_npy::{ReadNpyError, WriteNpyError};
use std::path::Path;
use tempo_othello::NUM_SPACES;

/// Evaluates an encoded move from the mover's point of view; higher is better.
///
/// Implementations must be deterministic and return finite values, and will
/// be called from several threads at once.
pub trait ScoringFunction: Send + Sync {
    fn score(&self, features: &FeatureBuffer) -> f32;
}

impl<F> ScoringFunction for F
where
    F: Fn(&FeatureBuffer) -> f32 + Send + Sync,
{
    fn score(&self, features: &FeatureBuffer) -> f32 {
        self(features)
    }
}

#[derive(Debug, Display, Error, From)]
pub enum ScoringError {
    #[display(fmt = "could not read model: {}", _0)]
    Read(ReadNpyError),
    #[display(fmt = "could not write model: {}", _0)]
    Write(WriteNpyError),
    #[display(fmt = "expected {} weights and a bias, found {} values", FEATURE_LEN, _0)]
    WrongShape(#[error(not(source))] usize),
}

/// A linear model over the flattened feature planes.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearModel {
    weights: Array1<f32>,
    bias: f32,
}

/// Value of placing a stone on each cell of the canonical quadrant and beyond.
#[rustfmt::skip]
const POSITIONAL: [f32; NUM_SPACES] = [
     1.00, -0.20,  0.10,  0.05,  0.05,  0.10, -0.20,  1.00,
    -0.20, -0.50, -0.02, -0.02, -0.02, -0.02, -0.50, -0.20,
     0.10, -0.02, -0.01, -0.01, -0.01, -0.01, -0.02,  0.10,
     0.05, -0.02, -0.01, -0.01, -0.01, -0.01, -0.02,  0.05,
     0.05, -0.02, -0.01, -0.01, -0.01, -0.01, -0.02,  0.05,
     0.10, -0.02, -0.01, -0.01, -0.01, -0.01, -0.02,  0.10,
    -0.20, -0.50, -0.02, -0.02, -0.02, -0.02, -0.50, -0.20,
     1.00, -0.20,  0.10,  0.05,  0.05,  0.10, -0.20,  1.00,
];

impl LinearModel {
    /// Build a model from [`FEATURE_LEN`] weights and a bias.
    pub fn new(weights: Array1<f32>, bias: f32) -> Result<Self, ScoringError> {
        if weights.len() != FEATURE_LEN {
            return Err(ScoringError::WrongShape(weights.len() + 1));
        }
        Ok(Self { weights, bias })
    }

    /// A hand-written model: the positional value of the move, a small bonus
    /// per changed stone, and a bonus for owning positionally strong cells.
    pub fn heuristic() -> Self {
        let mut weights = Array1::zeros(FEATURE_LEN);
        for (cell, &value) in POSITIONAL.iter().enumerate() {
            weights[NUM_SPACES * 3 + cell] = value;
            weights[NUM_SPACES * 4 + cell] = 0.01;
            weights[cell] = value * 0.1;
        }
        Self { weights, bias: 0.0 }
    }

    /// Load a model from an `.npy` file holding a 1-D `f32` array: the weights
    /// in flattened plane order, followed by the bias.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScoringError> {
        let values: Array1<f32> = ndarray_npy::read_npy(path)?;
        if values.len() != FEATURE_LEN + 1 {
            return Err(ScoringError::WrongShape(values.len()));
        }

        let bias = values[FEATURE_LEN];
        Self::new(values.slice(s![..FEATURE_LEN]).to_owned(), bias)
    }

    /// Save the model in the format read by [`LinearModel::load()`].
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ScoringError> {
        let mut values = self.weights.to_vec();
        values.push(self.bias);
        ndarray_npy::write_npy(path, &Array1::from(values))?;
        Ok(())
    }
}

impl ScoringFunction for LinearModel {
    fn score(&self, features: &FeatureBuffer) -> f32 {
        Array1::from(features.to_vec()).dot(&self.weights) + self.bias
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::encode_move;
    use tempo_othello::{Game, Location};

    #[test]
    fn heuristic_prefers_corners() {
        // White to move can take A1 or play next to it at B2.
        let board: tempo_othello::Board = "
            --------
            -OX-----
            --OX----
            ---XO---
            ----X---
            --------
            --------
            --------"
            .parse()
            .unwrap();
        let game = Game::from_board(board, tempo_othello::Player::White);
        let model = LinearModel::heuristic();

        let corner = model.score(&encode_move(&game, "A1".parse().unwrap()));
        let others: Vec<f32> = game
            .get_moves()
            .filter(|&mv| mv != "A1".parse::<Location>().unwrap())
            .map(|mv| model.score(&encode_move(&game, mv)))
            .collect();
        assert!(!others.is_empty());
        assert!(others.iter().all(|&score| score < corner));
    }

    #[test]
    fn closures_score() {
        let constant = |_: &FeatureBuffer| 0.5_f32;
        let features = encode_move(&Game::default(), Location::from_index(19));
        assert_eq!(constant.score(&features), 0.5);
    }

    #[test]
    fn save_and_load() {
        let path = std::env::temp_dir().join(format!("tempo-linear-{}.npy", std::process::id()));
        let model = LinearModel::heuristic();
        model.save(&path).unwrap();
        let loaded = LinearModel::load(&path).unwrap();
        assert_eq!(loaded, model);

        ndarray_npy::write_npy(&path, &Array1::<f32>::zeros(10)).unwrap();
        match LinearModel::load(&path) {
            Err(ScoringError::WrongShape(10)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            LinearModel::load("/nonexistent/model.npy"),
            Err(ScoringError::Read(_))
        ));
    }
}
