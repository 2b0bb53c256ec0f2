//! Data-parallel kernels over row-major `[h, w, c]` slices.
//!
//! Every kernel validates its inputs through `p2p_tensor::validate`, writes a
//! fresh output buffer, and splits the work into independent output pixels
//! (or channels) with rayon. `grain` is the minimum number of items one task
//! handles; it never affects the values produced.
//!
//! Convolutions skip taps that fall outside the input instead of multiplying
//! by a padded zero. Per output element the accumulation order is the same
//! as the scalar loops (filter row, filter column, input channel).

use rayon::prelude::*;

use p2p_tensor::prelude::*;
use p2p_tensor::{validate, BATCH_NORM_EPSILON};

#[inline]
fn in_range(i: isize, len: usize) -> bool {
    i >= 0 && (i as usize) < len
}

pub(crate) fn activation(input: &Tensor, act: Activation, grain: usize) -> Result<Tensor> {
    let mut data = input.as_slice().to_vec();
    data.par_chunks_mut(grain.max(1)).for_each(|chunk| {
        for v in chunk {
            *v = act.apply(*v);
        }
    });
    Tensor::new(validate::activation(input), data)
}

pub(crate) fn concat(a: &Tensor, b: &Tensor, grain: usize) -> Result<Tensor> {
    let shape = validate::concat(a, b)?;
    let c1 = a.dims()[2];
    let c2 = b.dims()[2];

    let mut data = vec![0.0f32; shape.numel()];
    data.par_chunks_mut(c1 + c2)
        .with_min_len(grain)
        .zip(a.as_slice().par_chunks(c1).zip(b.as_slice().par_chunks(c2)))
        .for_each(|(out, (lhs, rhs))| {
            out[..c1].copy_from_slice(lhs);
            out[c1..].copy_from_slice(rhs);
        });
    Tensor::new(shape, data)
}

pub(crate) fn batch_norm(
    input: &Tensor,
    scale: &Tensor,
    offset: &Tensor,
    grain: usize,
) -> Result<Tensor> {
    let shape = validate::batch_norm(input, scale, offset)?;
    let channels = input.dims()[2];
    let x = input.as_slice();
    let pixels = x.len() / channels;
    let scale = scale.as_slice();
    let offset = offset.as_slice();

    // (mean, scale / sqrt(variance + eps)) per channel
    let stats: Vec<(f32, f32)> = (0..channels)
        .into_par_iter()
        .with_min_len(grain)
        .map(|ch| {
            let column = || x.iter().skip(ch).step_by(channels);
            let mut mean = 0.0f32;
            for &v in column() {
                mean += v;
            }
            mean /= pixels as f32;

            let mut variance = 0.0f32;
            for &v in column() {
                variance += (v - mean) * (v - mean);
            }
            variance /= pixels as f32;

            (mean, scale[ch] / (variance + BATCH_NORM_EPSILON).sqrt())
        })
        .collect();

    let mut data = vec![0.0f32; x.len()];
    data.par_chunks_mut(channels)
        .zip(x.par_chunks(channels))
        .for_each(|(out, px)| {
            for (ch, o) in out.iter_mut().enumerate() {
                let (mean, adjusted) = stats[ch];
                *o = offset[ch] + (px[ch] - mean) * adjusted;
            }
        });
    Tensor::new(shape, data)
}

pub(crate) fn conv2d(input: &Tensor, filter: &Tensor, bias: &Tensor, grain: usize) -> Result<Tensor> {
    let shape = validate::conv2d(input, filter, bias)?;
    let (ih, iw, ic) = (input.dims()[0], input.dims()[1], input.dims()[2]);
    let (fh, fw, oc) = (filter.dims()[0], filter.dims()[1], filter.dims()[3]);
    let ow = shape.dim(1);

    let x = input.as_slice();
    let f = filter.as_slice();
    let bias = bias.as_slice();

    let mut data = vec![0.0f32; shape.numel()];
    data.par_chunks_mut(oc)
        .with_min_len(grain)
        .enumerate()
        .for_each(|(p, out)| {
            let (oy, ox) = (p / ow, p % ow);
            let ymin = (oy * 2) as isize - (fh / 2) as isize + 1;
            let xmin = (ox * 2) as isize - (fw / 2) as isize + 1;

            for fy in 0..fh {
                let y = ymin + fy as isize;
                if !in_range(y, ih) {
                    continue;
                }
                for fx in 0..fw {
                    let xx = xmin + fx as isize;
                    if !in_range(xx, iw) {
                        continue;
                    }
                    let src = &x[(y as usize * iw + xx as usize) * ic..][..ic];
                    for (i, &v) in src.iter().enumerate() {
                        let taps = &f[((fy * fw + fx) * ic + i) * oc..][..oc];
                        for (acc, &w) in out.iter_mut().zip(taps) {
                            *acc += v * w;
                        }
                    }
                }
            }

            for (acc, &b) in out.iter_mut().zip(bias) {
                *acc += b;
            }
        });
    Tensor::new(shape, data)
}

pub(crate) fn deconv2d(
    input: &Tensor,
    filter: &Tensor,
    bias: &Tensor,
    grain: usize,
) -> Result<Tensor> {
    let shape = validate::deconv2d(input, filter, bias)?;
    let (ih, iw, ic) = (input.dims()[0], input.dims()[1], input.dims()[2]);
    let (fh, fw, oc) = (filter.dims()[0], filter.dims()[1], filter.dims()[2]);
    let ow = shape.dim(1);

    let x = input.as_slice();
    let f = filter.as_slice();
    let bias = bias.as_slice();

    let mut data = vec![0.0f32; shape.numel()];
    data.par_chunks_mut(oc)
        .with_min_len(grain)
        .enumerate()
        .for_each(|(p, out)| {
            let (oy, ox) = (p / ow, p % ow);
            // floor division: oy == 0 gives -1
            let ymin = (oy as isize - 1).div_euclid(2);
            let xmin = (ox as isize - 1).div_euclid(2);

            for fy in (oy % 2..fh).step_by(2) {
                let y = ymin + (fy / 2) as isize;
                if !in_range(y, ih) {
                    continue;
                }
                for fx in (ox % 2..fw).step_by(2) {
                    let xx = xmin + (fx / 2) as isize;
                    if !in_range(xx, iw) {
                        continue;
                    }
                    let src = &x[(y as usize * iw + xx as usize) * ic..][..ic];
                    // flipped tap, laid out [oc][ic]
                    let taps = &f[((fh - 1 - fy) * fw + (fw - 1 - fx)) * oc * ic..][..oc * ic];
                    for (i, &v) in src.iter().enumerate() {
                        for (o, acc) in out.iter_mut().enumerate() {
                            *acc += v * taps[o * ic + i];
                        }
                    }
                }
            }

            for (acc, &b) in out.iter_mut().zip(bias) {
                *acc += b;
            }
        });
    Tensor::new(shape, data)
}
