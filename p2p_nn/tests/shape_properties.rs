//! Property-style tests over randomly drawn small shapes.
//!
//! For every operation the output shape must follow its formula under both
//! strategies, and the tensor accessors must behave as zero-padded storage.

use p2p_nn::{EngineConfig, LayerOps, Strategy};
use p2p_tensor::prelude::*;

const CASES: usize = 40;

/// Simple pseudo-random number generator (xorshift) for reproducible tests.
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Rng(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Uniform in [lo, hi]
    fn range(&mut self, lo: usize, hi: usize) -> usize {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as usize
    }

    fn tensor(&mut self, dims: &[usize]) -> Tensor {
        let n: usize = dims.iter().product();
        let data = (0..n)
            .map(|_| (self.next_u64() % 2001) as f32 / 1000.0 - 1.0)
            .collect();
        Tensor::from_vec(dims, data).unwrap()
    }
}

fn both() -> Vec<Box<dyn LayerOps>> {
    [Strategy::Reference, Strategy::Accelerated]
        .into_iter()
        .map(|s| EngineConfig::new().with_strategy(s).build().unwrap())
        .collect()
}

#[test]
fn test_elementwise_and_concat_shapes() {
    let mut rng = Rng::new(0xdead_beef);
    for ops in both() {
        for _ in 0..CASES {
            let (h, w) = (rng.range(1, 12), rng.range(1, 12));
            let (c1, c2) = (rng.range(1, 6), rng.range(1, 6));
            let a = rng.tensor(&[h, w, c1]);
            let b = rng.tensor(&[h, w, c2]);

            assert_eq!(ops.relu(&a).unwrap().shape(), a.shape());
            assert_eq!(ops.tanh(&a).unwrap().shape(), a.shape());
            assert_eq!(ops.leaky_relu(&b, 0.2).unwrap().shape(), b.shape());

            let ab = ops.concat(&a, &b).unwrap();
            assert_eq!(ab.dims(), &[h, w, c1 + c2]);
            // channels of `a` come first, then `b`
            let (y, x) = ((h - 1) as isize, (w - 1) as isize);
            assert_eq!(ab.get3(y, x, 0), a.get3(y, x, 0));
            assert_eq!(ab.get3(y, x, c1 as isize), b.get3(y, x, 0));
        }
    }
}

#[test]
fn test_normalisation_shapes() {
    let mut rng = Rng::new(0x0dd_ba11);
    for ops in both() {
        for _ in 0..CASES {
            let dims = [rng.range(1, 8), rng.range(1, 8), rng.range(1, 9)];
            let x = rng.tensor(&dims);
            let scale = rng.tensor(&[dims[2]]);
            let offset = rng.tensor(&[dims[2]]);
            let y = ops.batch_norm(&x, &scale, &offset).unwrap();
            assert_eq!(y.dims(), &dims);
            assert!(y.as_slice().iter().all(|v| v.is_finite()));
        }
    }
}

#[test]
fn test_convolution_shapes() {
    let mut rng = Rng::new(0xc0ff_ee00);
    for ops in both() {
        for _ in 0..CASES {
            let (h, w) = (rng.range(2, 11), rng.range(2, 11));
            let (ic, oc) = (rng.range(1, 4), rng.range(1, 6));
            let (fh, fw) = (rng.range(1, 5), rng.range(1, 5));

            let x = rng.tensor(&[h, w, ic]);
            let down = ops
                .conv2d(&x, &rng.tensor(&[fh, fw, ic, oc]), &rng.tensor(&[oc]))
                .unwrap();
            assert_eq!(down.dims(), &[h / 2, w / 2, oc]);

            let up = ops
                .deconv2d(&x, &rng.tensor(&[fh, fw, oc, ic]), &rng.tensor(&[oc]))
                .unwrap();
            assert_eq!(up.dims(), &[2 * h, 2 * w, oc]);
        }
    }
}

#[test]
fn test_inputs_are_not_mutated() {
    let mut rng = Rng::new(99);
    let x = rng.tensor(&[6, 6, 2]);
    let f = rng.tensor(&[4, 4, 2, 3]);
    let b = rng.tensor(&[3]);
    let before = (x.clone(), f.clone(), b.clone());
    for ops in both() {
        ops.conv2d(&x, &f, &b).unwrap();
        ops.tanh(&x).unwrap();
    }
    assert_eq!((x, f, b), before);
}

#[test]
fn test_set_then_get_round_trip() {
    let mut rng = Rng::new(0xfeed);
    for rank in 1..=4 {
        for _ in 0..CASES {
            let dims: Vec<usize> = (0..rank).map(|_| rng.range(1, 5)).collect();
            let mut t = Tensor::zeros(Shape::new(dims.clone()).unwrap());
            let index: Vec<isize> = dims.iter().map(|&d| rng.range(0, d - 1) as isize).collect();
            let value = rng.range(1, 1000) as f32;

            t.set(&index, value).unwrap();
            assert_eq!(t.get(&index).unwrap(), value);
            assert_eq!(t.as_slice().iter().filter(|&&v| v != 0.0).count(), 1);
        }
    }
}

#[test]
fn test_out_of_range_access() {
    let mut rng = Rng::new(0xabcd);
    for _ in 0..CASES {
        let dims = [rng.range(1, 5), rng.range(1, 5), rng.range(1, 5)];
        let mut t = rng.tensor(&dims);
        let before = t.clone();

        // one coordinate pushed just outside the valid range, either side
        let axis = rng.range(0, 2);
        let mut index: Vec<isize> = dims.iter().map(|&d| rng.range(0, d - 1) as isize).collect();
        index[axis] = if rng.range(0, 1) == 0 {
            -1
        } else {
            dims[axis] as isize
        };

        assert_eq!(t.get(&index).unwrap(), 0.0);
        assert_eq!(t.get3(index[0], index[1], index[2]), 0.0);
        t.set(&index, 42.0).unwrap();
        t.set3(index[0], index[1], index[2], 42.0);
        assert_eq!(t, before);
    }
}

#[test]
fn test_accessor_rank_checked() {
    let mut t = Tensor::zeros(Shape::new(vec![2, 2]).unwrap());
    assert_eq!(
        t.get(&[0, 0, 0]),
        Err(TensorError::RankMismatch {
            expected: 2,
            got: 3
        })
    );
    assert!(t.set(&[0], 1.0).is_err());
}
