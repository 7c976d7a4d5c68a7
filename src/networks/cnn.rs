//! CNN Encoder
//!
//! Convolution stack over channels-last images, flattened and projected to the
//! latent width.
//!
//! Every layer but the last pads so that its output is `ceil(input / stride)`
//! (splitting odd padding towards the larger side); the last layer is unpadded.

use burn::module::Ignored;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::{Linear, LinearConfig, PaddingConfig2d};
use burn::prelude::*;

use super::Activation;
use crate::error::{self, CatalogError};
use crate::models::FilterSpec;

/// CNN encoder configuration
#[derive(Config, Debug, PartialEq)]
pub struct CnnEncoderConfig {
    /// Input image as `[height, width, channels]`
    pub input_dims: [usize; 3],
    pub filter_specifiers: Vec<FilterSpec>,
    #[config(default = "Activation::Relu")]
    pub filter_layer_activation: Activation,
    pub output_dim: usize,
    #[config(default = "Activation::Tanh")]
    pub output_activation: Activation,
}

/// Padding and output extent of one convolution layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvGeometry {
    pub padding: [usize; 2],
    pub output: [usize; 2],
}

impl CnnEncoderConfig {
    /// Per-layer padding and output extents, or why the stack cannot be built
    pub fn layer_geometry(&self) -> error::Result<Vec<ConvGeometry>> {
        let [height, width, channels] = self.input_dims;
        if height == 0 || width == 0 || channels == 0 {
            return Err(CatalogError::invalid(format!(
                "CNN input dims must be positive, got {:?}",
                self.input_dims
            )));
        }
        if self.filter_specifiers.is_empty() {
            return Err(CatalogError::invalid("CNN encoder needs at least one filter"));
        }
        if self.output_dim == 0 {
            return Err(CatalogError::invalid("CNN output_dim must be positive"));
        }

        let last = self.filter_specifiers.len() - 1;
        let mut extent = [height, width];
        let mut geometry = Vec::with_capacity(self.filter_specifiers.len());

        for (i, spec) in self.filter_specifiers.iter().enumerate() {
            if spec.out_channels == 0 || spec.kernel.contains(&0) || spec.stride.contains(&0) {
                return Err(CatalogError::invalid(format!(
                    "filter {i} has a zero channel, kernel or stride: {spec:?}"
                )));
            }

            let mut padding = [0; 2];
            let mut output = [0; 2];
            for axis in 0..2 {
                let (input, kernel, stride) = (extent[axis], spec.kernel[axis], spec.stride[axis]);
                let pad = if i < last {
                    same_padding(input, kernel, stride)
                } else {
                    0
                };
                if input + 2 * pad < kernel {
                    return Err(CatalogError::invalid(format!(
                        "filter {i} kernel {:?} exceeds its input {extent:?}",
                        spec.kernel
                    )));
                }
                padding[axis] = pad;
                output[axis] = (input + 2 * pad - kernel) / stride + 1;
            }

            geometry.push(ConvGeometry { padding, output });
            extent = output;
        }

        Ok(geometry)
    }

    /// Width of the flattened convolution output
    pub fn flat_conv_dim(&self) -> error::Result<usize> {
        let geometry = self.layer_geometry()?;
        let out_channels = self.filter_specifiers[geometry.len() - 1].out_channels;
        let [h, w] = geometry[geometry.len() - 1].output;
        Ok(out_channels * h * w)
    }

    /// Initialize the encoder network
    pub fn init<B: Backend>(&self, device: &B::Device) -> error::Result<CnnEncoder<B>> {
        let geometry = self.layer_geometry()?;

        let mut in_channels = self.input_dims[2];
        let mut convs = Vec::with_capacity(geometry.len());
        for (spec, layer) in self.filter_specifiers.iter().zip(&geometry) {
            let conv = Conv2dConfig::new([in_channels, spec.out_channels], spec.kernel)
                .with_stride(spec.stride)
                .with_padding(PaddingConfig2d::Explicit(layer.padding[0], layer.padding[1]))
                .init(device);
            convs.push(conv);
            in_channels = spec.out_channels;
        }

        let [h, w] = geometry[geometry.len() - 1].output;
        let flat = in_channels * h * w;

        Ok(CnnEncoder {
            convs,
            projection: LinearConfig::new(flat, self.output_dim).init(device),
            input_dims: Ignored(self.input_dims),
            filter_activation: Ignored(self.filter_layer_activation),
            output_activation: Ignored(self.output_activation),
        })
    }
}

/// Per-side padding that keeps the output at `ceil(input / stride)`
fn same_padding(input: usize, kernel: usize, stride: usize) -> usize {
    let output = input.div_ceil(stride);
    let total = ((output - 1) * stride + kernel).saturating_sub(input);
    total.div_ceil(2)
}

#[derive(Module, Debug)]
pub struct CnnEncoder<B: Backend> {
    convs: Vec<Conv2d<B>>,
    projection: Linear<B>,
    input_dims: Ignored<[usize; 3]>,
    filter_activation: Ignored<Activation>,
    output_activation: Ignored<Activation>,
}

impl<B: Backend> CnnEncoder<B> {
    /// `[batch, height, width, channels]` -> `[batch, output_dim]`
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = images.permute([0, 3, 1, 2]);
        let x = self
            .convs
            .iter()
            .fold(x, |x, conv| self.filter_activation.apply(conv.forward(x)));
        let x: Tensor<B, 2> = x.flatten(1, 3);
        self.output_activation.apply(self.projection.forward(x))
    }

    /// Flattened `[batch, height * width * channels]` input
    pub fn forward_flat(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let [batch, _] = x.dims();
        let [h, w, c] = *self.input_dims;
        self.forward(x.reshape([batch, h, w, c]))
    }

    pub fn input_dims(&self) -> [usize; 3] {
        *self.input_dims
    }

    pub fn output_dim(&self) -> usize {
        self.projection.weight.dims()[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_filter_config;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_same_padding() {
        assert_eq!(same_padding(84, 8, 4), 2);
        assert_eq!(same_padding(21, 4, 2), 2);
        assert_eq!(same_padding(10, 5, 2), 2);
        assert_eq!(same_padding(4, 1, 1), 0);
    }

    #[test]
    fn test_atari_geometry() {
        let config = CnnEncoderConfig::new(
            [84, 84, 4],
            default_filter_config(&[84, 84, 4]).unwrap(),
            256,
        );
        let outputs: Vec<[usize; 2]> = config
            .layer_geometry()
            .unwrap()
            .iter()
            .map(|g| g.output)
            .collect();

        assert_eq!(outputs, vec![[21, 21], [11, 11], [1, 1]]);
        assert_eq!(config.flat_conv_dim().unwrap(), 256);
    }

    #[test]
    fn test_oversized_kernel_rejected() {
        let config =
            CnnEncoderConfig::new([4, 4, 1], vec![FilterSpec::square(8, 5, 1)], 16);
        assert!(matches!(
            config.layer_geometry(),
            Err(CatalogError::InvalidConfiguration(_))
        ));
        assert!(config.init::<TestBackend>(&Default::default()).is_err());
    }

    #[test]
    fn test_cnn_forward() {
        let device = Default::default();
        let config = CnnEncoderConfig::new(
            [10, 10, 3],
            default_filter_config(&[10, 10, 3]).unwrap(),
            16,
        );
        let encoder = config.init::<TestBackend>(&device).unwrap();

        let images = Tensor::<TestBackend, 4>::zeros([2, 10, 10, 3], &device);
        assert_eq!(encoder.forward(images).dims(), [2, 16]);

        let flat = Tensor::<TestBackend, 2>::zeros([2, 300], &device);
        assert_eq!(encoder.forward_flat(flat).dims(), [2, 16]);
    }
}
