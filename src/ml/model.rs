use burn::{
    module::{ModuleVisitor, ParamId},
    nn::{BiLstm, BiLstmConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::log_softmax,
};

#[derive(Config, Debug)]
pub struct ActivityLstmConfig {
    pub n_hidden: usize,
    /// Accelerometer channels per time step
    #[config(default = 3)]
    pub n_features: usize,
    #[config(default = 6)]
    pub n_classes: usize,
    /// Stacked bidirectional layers
    #[config(default = 2)]
    pub n_layers: usize,
}

impl ActivityLstmConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ActivityLstm<B> {
        let layers: Vec<BiLstm<B>> = (0..self.n_layers)
            .map(|i| {
                // Layer 0 sees raw x/y/z, later layers see fw ‖ bw of the layer below
                let d_input = if i == 0 { self.n_features } else { 2 * self.n_hidden };
                BiLstmConfig::new(d_input, self.n_hidden, true).init(device)
            })
            .collect();
        let output = LinearConfig::new(2 * self.n_hidden, self.n_classes).init(device);
        ActivityLstm { layers, output }
    }
}

/// Stacked bidirectional LSTM with a linear head on the last time step.
#[derive(Module, Debug)]
pub struct ActivityLstm<B: Backend> {
    pub layers: Vec<BiLstm<B>>,
    pub output: Linear<B>,
}

impl<B: Backend> ActivityLstm<B> {
    /// features: [batch, time, 3] → logits: [batch, classes]
    pub fn forward(&self, features: Tensor<B, 3>) -> Tensor<B, 2> {
        let mut x = features;
        for layer in &self.layers {
            let (out, _state) = layer.forward(x, None);
            x = out;
        }

        // Many-to-one: keep only the last time step of the top layer.
        let [batch_size, seq_len, d_model] = x.dims();
        let last = x
            .slice([0..batch_size, seq_len - 1..seq_len, 0..d_model])
            .reshape([batch_size, d_model]);

        self.output.forward(last)
    }

    /// Mean softmax cross-entropy against one-hot targets plus the
    /// L2 penalty over every trainable parameter.
    pub fn forward_loss(
        &self,
        features:  Tensor<B, 3>,
        targets:   Tensor<B, 2>,
        l2_weight: f64,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(features);
        let ce     = softmax_cross_entropy(logits.clone(), targets).mean();
        let loss   = ce + self.l2_penalty(l2_weight);
        (loss, logits)
    }

    /// l2_weight * Σ sum(p²) / 2, the same scaling as TensorFlow's l2_loss.
    /// Stays on the autodiff graph, so it contributes to the gradients.
    pub fn l2_penalty(&self, l2_weight: f64) -> Tensor<B, 1> {
        let mut norm = SquaredNorm::<B> { total: None };
        self.visit(&mut norm);
        match norm.total {
            Some(total) => total * (l2_weight / 2.0),
            None        => Tensor::zeros([1], &self.output.weight.val().device()),
        }
    }
}

/// Sums the squares of every float parameter in a module
struct SquaredNorm<B: Backend> {
    total: Option<Tensor<B, 1>>,
}

impl<B: Backend> ModuleVisitor<B> for SquaredNorm<B> {
    fn visit_float<const D: usize>(&mut self, _id: ParamId, tensor: &Tensor<B, D>) {
        let sq = (tensor.clone() * tensor.clone()).sum();
        self.total = Some(match self.total.take() {
            Some(total) => total + sq,
            None        => sq,
        });
    }
}

/// Per-sample cross-entropy between softmax(logits) and one-hot
/// targets: [batch, classes] → [batch]
pub fn softmax_cross_entropy<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
    let [batch_size, _] = logits.dims();
    (log_softmax(logits, 1) * targets)
        .sum_dim(1)
        .neg()
        .reshape([batch_size])
}

/// How many rows have argmax(logits) == argmax(targets)
pub fn count_correct<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> usize {
    // argmax(1) returns [batch, 1] for both sides, so shapes line up
    let predicted = logits.argmax(1);
    let expected  = targets.argmax(1);
    predicted
        .equal(expected)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>() as usize
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model: ActivityLstm<TestBackend> = ActivityLstmConfig::new(4).init(&device);
        let features = Tensor::<TestBackend, 3>::zeros([5, 12, 3], &device);
        assert_eq!(model.forward(features).dims(), [5, 6]);
    }

    #[test]
    fn test_layer_stack_dimensions() {
        let device = Default::default();
        let model: ActivityLstm<TestBackend> = ActivityLstmConfig::new(7)
            .with_n_layers(3)
            .init(&device);
        assert_eq!(model.layers.len(), 3);
        let features = Tensor::<TestBackend, 3>::ones([2, 4, 3], &device);
        assert_eq!(model.forward(features).dims(), [2, 6]);
    }

    #[test]
    fn test_cross_entropy_of_uniform_logits() {
        let device  = Default::default();
        let logits  = Tensor::<TestBackend, 2>::zeros([2, 6], &device);
        let targets = Tensor::<TestBackend, 2>::from_floats(
            [[1.0, 0.0, 0.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 0.0, 0.0, 1.0]],
            &device,
        );
        let ce = softmax_cross_entropy(logits, targets).into_data().convert::<f32>().to_vec::<f32>().unwrap();
        for v in ce {
            assert!((v - 6.0f32.ln()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_count_correct() {
        let device  = Default::default();
        let logits  = Tensor::<TestBackend, 2>::from_floats([[0.1, 2.0, 0.3], [5.0, 0.0, 0.0]], &device);
        let targets = Tensor::<TestBackend, 2>::from_floats([[0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], &device);
        assert_eq!(count_correct(logits, targets), 1);
    }

    #[test]
    fn test_l2_penalty_scales_with_weight() {
        let device = Default::default();
        let model: ActivityLstm<TestBackend> = ActivityLstmConfig::new(3).init(&device);
        let zero = model.l2_penalty(0.0).into_scalar().elem::<f64>();
        let one  = model.l2_penalty(1.0).into_scalar().elem::<f64>();
        let two  = model.l2_penalty(2.0).into_scalar().elem::<f64>();
        assert_eq!(zero, 0.0);
        assert!(one > 0.0);
        assert!((two - 2.0 * one).abs() < 1e-3 * one.max(1.0));
    }
}
