//! Kernel-variant selection.
//!
//! Pure functions from operation shape to [`KernelVariant`]. Thresholds live
//! here only; the numerical code never looks at them.

use p2p_tensor::{Activation, KernelVariant};

/// The activation's own kernel; alpha travels as a request parameter.
pub fn select_activation(activation: Activation) -> KernelVariant {
    activation.variant()
}

/// By spatial element count `height * width`.
pub fn select_concat(height: usize, width: usize) -> KernelVariant {
    match height * width {
        n if n < 64 => KernelVariant::Concat4,
        n if n < 512 => KernelVariant::Concat64,
        _ => KernelVariant::Concat512,
    }
}

/// By channel count.
pub fn select_batch_norm(channels: usize) -> KernelVariant {
    if channels == 512 {
        KernelVariant::BatchNorm512
    } else {
        KernelVariant::BatchNorm64
    }
}

/// By output channel count.
pub fn select_conv_down(out_channels: usize) -> KernelVariant {
    if out_channels >= 512 {
        KernelVariant::Conv2D_512_1
    } else {
        KernelVariant::Conv2D_64_8
    }
}

/// By output channel count; 3 is the RGB output layer.
pub fn select_conv_up(out_channels: usize) -> KernelVariant {
    match out_channels {
        3 => KernelVariant::TransConv2D_3_128,
        n if n >= 512 => KernelVariant::TransConv2D_512_1,
        _ => KernelVariant::TransConv2D_64_8,
    }
}
