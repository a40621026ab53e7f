//! Gradient storage for training.

/// Gradient and hessian of the loss for one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GradsTuple {
    pub grad: f32,
    pub hess: f32,
}

/// Per-sample gradient/hessian pairs for a single-output model.
#[derive(Debug, Clone)]
pub struct Gradients {
    pairs: Vec<GradsTuple>,
}

impl Gradients {
    /// Zero-initialized storage for `n_rows` samples.
    pub fn new(n_rows: usize) -> Self {
        Self {
            pairs: vec![GradsTuple::default(); n_rows],
        }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn pairs(&self) -> &[GradsTuple] {
        &self.pairs
    }

    #[inline]
    pub fn pairs_mut(&mut self) -> &mut [GradsTuple] {
        &mut self.pairs
    }

    /// Sum of gradients and hessians over `rows`, accumulated in f64.
    pub fn sum(&self, rows: &[usize]) -> (f64, f64) {
        rows.iter().fold((0.0, 0.0), |(g, h), &r| {
            let gh = self.pairs[r];
            (g + gh.grad as f64, h + gh.hess as f64)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_over_subset() {
        let mut grads = Gradients::new(3);
        grads.pairs_mut()[0] = GradsTuple { grad: 1.0, hess: 1.0 };
        grads.pairs_mut()[1] = GradsTuple { grad: -2.0, hess: 0.5 };
        grads.pairs_mut()[2] = GradsTuple { grad: 4.0, hess: 2.0 };

        assert_eq!(grads.sum(&[0, 2]), (5.0, 3.0));
        assert_eq!(grads.sum(&[]), (0.0, 0.0));
        assert_eq!(grads.n_rows(), 3);
    }
}
