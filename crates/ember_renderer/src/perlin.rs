//! Gradient (Perlin) noise.

use crate::sampling::{gen_range_usize, random_vec3};
use ember_math::Vec3;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Lattice gradient noise with hashed permutation tables.
pub struct Perlin {
    random_vectors: [Vec3; POINT_COUNT],
    perm_x: [usize; POINT_COUNT],
    perm_y: [usize; POINT_COUNT],
    perm_z: [usize; POINT_COUNT],
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let mut random_vectors = [Vec3::ZERO; POINT_COUNT];
        for v in random_vectors.iter_mut() {
            *v = random_vec3(rng, -1.0, 1.0).normalize_or(Vec3::X);
        }

        Self {
            random_vectors,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Smoothed noise in roughly [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i64;
        let j = p.y.floor() as i64;
        let k = p.z.floor() as i64;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    *cell = self.random_vectors[self.perm_x[wrap(i + di as i64)]
                        ^ self.perm_y[wrap(j + dj as i64)]
                        ^ self.perm_z[wrap(k + dk as i64)]];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }

    /// Sum of `depth` noise octaves with halving weight.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0_f32;
        let mut temp_p = p;
        let mut weight = 1.0_f32;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

#[inline]
fn wrap(n: i64) -> usize {
    (n & 255) as usize
}

fn generate_perm(rng: &mut dyn RngCore) -> [usize; POINT_COUNT] {
    let mut p = [0usize; POINT_COUNT];
    for (i, slot) in p.iter_mut().enumerate() {
        *slot = i;
    }

    // Fisher-Yates
    for i in (1..POINT_COUNT).rev() {
        let target = gen_range_usize(rng, 0, i);
        p.swap(i, target);
    }
    p
}

fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    // Hermite smoothing
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0_f32;
    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                let weight_v = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight_v);
            }
        }
    }
    accum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_permutations_are_permutations() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut perm = generate_perm(&mut rng);
        perm.sort_unstable();
        for (i, value) in perm.iter().enumerate() {
            assert_eq!(*value, i);
        }
    }

    #[test]
    fn test_noise_is_zero_on_lattice_points() {
        let mut rng = StdRng::seed_from_u64(12);
        let perlin = Perlin::new(&mut rng);

        // Gradient noise vanishes at integer coordinates
        for p in [Vec3::ZERO, Vec3::new(3.0, -2.0, 7.0), Vec3::new(-10.0, 5.0, 1.0)] {
            assert!(perlin.noise(p).abs() < 1e-5);
        }
    }

    #[test]
    fn test_noise_is_bounded_and_deterministic() {
        let mut rng = StdRng::seed_from_u64(13);
        let perlin = Perlin::new(&mut rng);

        for i in 0..200 {
            let p = Vec3::new(i as f32 * 0.37, i as f32 * -0.11, i as f32 * 0.53);
            let n = perlin.noise(p);
            assert!((-1.5..=1.5).contains(&n));
            assert_eq!(n, perlin.noise(p));
        }
    }

    #[test]
    fn test_turbulence_non_negative() {
        let mut rng = StdRng::seed_from_u64(14);
        let perlin = Perlin::new(&mut rng);

        for i in 0..50 {
            let p = Vec3::splat(i as f32 * 0.29);
            assert!(perlin.turbulence(p, 7) >= 0.0);
        }
    }
}
