//! Stride-2 convolution and transposed convolution.
//!
//! Neither function pads its input: taps that land outside it read `0.0`
//! through [`Tensor::get3`].

use p2p_tensor::prelude::*;
use p2p_tensor::validate;

/// Downsampling convolution.
///
/// `input` is `[h, w, ic]`, `filter` is `[fh, fw, ic, oc]`, `bias` is `[oc]`;
/// the output is `[h / 2, w / 2, oc]`. The window for output `(oy, ox)` starts
/// at `(2 * oy - fh / 2 + 1, 2 * ox - fw / 2 + 1)`.
pub fn conv2d(input: &Tensor, filter: &Tensor, bias: &Tensor) -> Result<Tensor> {
    let shape = validate::conv2d(input, filter, bias)?;
    let in_channels = input.dims()[2] as isize;
    let filter_height = filter.dims()[0] as isize;
    let filter_width = filter.dims()[1] as isize;
    let (out_height, out_width, out_channels) = (
        shape.dim(0) as isize,
        shape.dim(1) as isize,
        shape.dim(2) as isize,
    );

    let mut output = Tensor::zeros(shape);
    for oc in 0..out_channels {
        for oy in 0..out_height {
            let ymin = oy * 2 - filter_height / 2 + 1;
            for ox in 0..out_width {
                let xmin = ox * 2 - filter_width / 2 + 1;
                let mut prod = 0.0f32;
                for fy in 0..filter_height {
                    for fx in 0..filter_width {
                        for ic in 0..in_channels {
                            let pixel = input.get3(ymin + fy, xmin + fx, ic);
                            let weight = filter.get4(fy, fx, ic, oc);
                            prod += pixel * weight;
                        }
                    }
                }
                output.set3(oy, ox, oc, prod + bias.get1(oc));
            }
        }
    }
    Ok(output)
}

/// Upsampling (transposed) convolution.
///
/// `input` is `[h, w, ic]`, `filter` is `[fh, fw, oc, ic]` (channel axes
/// swapped relative to [`conv2d`]), `bias` is `[oc]`; the output is
/// `[2h, 2w, oc]`. Output `(oy, ox)` gathers the filter taps whose parity
/// matches `(oy % 2, ox % 2)`, read in flipped order.
pub fn deconv2d(input: &Tensor, filter: &Tensor, bias: &Tensor) -> Result<Tensor> {
    let shape = validate::deconv2d(input, filter, bias)?;
    let in_channels = input.dims()[2] as isize;
    let filter_height = filter.dims()[0] as isize;
    let filter_width = filter.dims()[1] as isize;
    let (out_height, out_width, out_channels) = (
        shape.dim(0) as isize,
        shape.dim(1) as isize,
        shape.dim(2) as isize,
    );

    let mut output = Tensor::zeros(shape);
    for oc in 0..out_channels {
        for oy in 0..out_height {
            // must round toward -inf: (0 - 1) / 2 is -1, not 0
            let ymin = (oy - 1).div_euclid(2);
            for ox in 0..out_width {
                let xmin = (ox - 1).div_euclid(2);
                let mut prod = 0.0f32;
                for fy in (oy % 2..filter_height).step_by(2) {
                    for fx in (ox % 2..filter_width).step_by(2) {
                        for ic in 0..in_channels {
                            let pixel = input.get3(ymin + fy / 2, xmin + fx / 2, ic);
                            let weight = filter.get4(
                                filter_height - 1 - fy,
                                filter_width - 1 - fx,
                                oc,
                                ic,
                            );
                            prod += pixel * weight;
                        }
                    }
                }
                output.set3(oy, ox, oc, prod + bias.get1(oc));
            }
        }
    }
    Ok(output)
}
