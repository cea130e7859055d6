//! Row-parallel drivers.
//!
//! Kernels write disjoint output rows while reading from an immutable
//! source, so results do not depend on the thread count. Without the
//! `parallel` feature the same closures run sequentially.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls `f(y, row)` for every `row_len`-sized row of `dst`.
pub(crate) fn for_each_row<T, F>(dst: &mut [T], row_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_len == 0 {
        return;
    }
    #[cfg(feature = "parallel")]
    dst.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));

    #[cfg(not(feature = "parallel"))]
    dst.chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

/// Applies `f` to every element of `data`.
pub(crate) fn for_each_pixel<T, F>(data: &mut [T], f: F)
where
    T: Send,
    F: Fn(&mut T) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    data.par_iter_mut().for_each(f);

    #[cfg(not(feature = "parallel"))]
    data.iter_mut().for_each(f);
}

/// Transposes a row-major `width x height` grid.
pub(crate) fn transpose<T: Copy + Send + Sync + Default>(src: &[T], width: usize, height: usize) -> Vec<T> {
    let mut dst = vec![T::default(); src.len()];
    for_each_row(&mut dst, height, |x, col| {
        for (y, v) in col.iter_mut().enumerate() {
            *v = src[y * width + x];
        }
    });
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_each_row_indices() {
        let mut data = vec![0usize; 12];
        for_each_row(&mut data, 4, |y, row| row.iter_mut().for_each(|v| *v = y));
        assert_eq!(data, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn test_transpose() {
        let src = vec![1, 2, 3, 4, 5, 6];
        let t = transpose(&src, 3, 2);
        assert_eq!(t, vec![1, 4, 2, 5, 3, 6]);
        assert_eq!(transpose(&t, 2, 3), src);
    }

    #[test]
    fn test_zero_row_len() {
        let mut data: Vec<u8> = Vec::new();
        for_each_row(&mut data, 0, |_, _| unreachable!());
    }
}
