use num_traits::{Zero, One};
use num_traits::Float;
use crate::solver::{Proj, ProjStat, LinAlg, SolverError};
use crate::{GridFloat, DevBuf, Layout, Band, NewtonParam};
use crate::{ProjRPos, ProjSOC, ProjExpBand};

//

/// Problem scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales<F: Float>
{
    /// Exponent scale \\(c\\) of the exponential band.
    pub z_scale: F,
    /// Lower coefficient \\(\rho_{lo}\\) of the exponential band.
    pub rho_lo: F,
    /// Upper coefficient \\(\rho_{hi}\\) of the exponential band.
    pub rho_hi: F,
    /// Thrust cone coefficient \\(t\\).
    pub cone_coef: F,
    /// Pointing coefficient.
    pub point_coef: F,
}

impl<F: Float> Scales<F>
{
    /// Creates an instance from five scalars in order of
    /// z-scale, exponential lower/upper coefficients, cone coefficient, pointing coefficient.
    pub fn from_array(s: [F; 5]) -> Self
    {
        Scales {
            z_scale: s[0],
            rho_lo: s[1],
            rho_hi: s[2],
            cone_coef: s[3],
            point_coef: s[4],
        }
    }

    /// Validates the scales.
    ///
    /// Returns `Err` with [`SolverError::InvalidScale`] if any scale is non-finite,
    /// \\(\rho_{lo} > \rho_{hi}\\), or the cone coefficient is not positive.
    pub fn check(&self) -> Result<(), SolverError>
    {
        let all = [self.z_scale, self.rho_lo, self.rho_hi, self.cone_coef, self.point_coef];

        if all.iter().any(|s| !s.is_finite()) {
            log::error!("Non-finite scale");
            return Err(SolverError::InvalidScale);
        }
        if self.rho_lo > self.rho_hi {
            log::error!("Exponential band is empty: rho_lo > rho_hi");
            return Err(SolverError::InvalidScale);
        }
        if self.cone_coef <= F::zero() {
            log::error!("Cone coefficient must be positive");
            return Err(SolverError::InvalidScale);
        }

        Ok(())
    }
}

//

/// Band projection dispatch
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// For a band and a node, takes the primal value \\(p\\) of the band from the affine candidate,
/// projects \\(p + y_s\\) and updates
/// \\[
/// w \leftarrow \Pi(p + y_s), \quad y_s \leftarrow y_s + p - w.
/// \\]
pub struct BandProj<L: LinAlg>
{
    rpos: ProjRPos<L>,
    soc: ProjSOC<L>,
    exp: ProjExpBand<L>,
    point_coef: L::F,
}

impl<L: LinAlg> BandProj<L>
{
    /// Creates an instance.
    ///
    /// Returns [`BandProj`] instance.
    /// * `scales` is the problem scales.
    /// * `newton` is parameters of the root-finder used by the exponential band.
    pub fn new(scales: &Scales<L::F>, newton: NewtonParam<L::F>) -> Self
    {
        BandProj {
            rpos: ProjRPos::new(),
            soc: ProjSOC::new(scales.cone_coef),
            exp: ProjExpBand::new(scales.z_scale, scales.rho_lo, scales.rho_hi, newton),
            point_coef: scales.point_coef,
        }
    }
}

impl<L: LinAlg> BandProj<L>
where L::F: GridFloat
{
    /// Primal value of a band for a node, computed from the affine candidate.
    ///
    /// * `p` receives the value; its first `band.width()` elements are written.
    /// * `buff_y` is the affine candidate.
    /// * `z_lb` and `z_ub` are the bounds of \\(z\\), offset by one node.
    ///   `z_lb[0]` stands for \\(z\\) before the first node.
    pub fn primal(&self, band: Band, node: usize, layout: &Layout,
        buff_y: DevBuf<'_, L::F>, z_lb: &[L::F], z_ub: &[L::F], p: &mut [L::F; 4])
    {
        match band {
            Band::ZLower => {
                p[0] = buff_y.get(layout.z(node)) - z_lb[node + 1];
            },
            Band::ZUpper => {
                p[0] = -buff_y.get(layout.z(node)) + z_ub[node + 1];
            },
            Band::Pointing => {
                p[0] = buff_y.get(layout.control(node)) - self.point_coef * buff_y.get(layout.sigma(node));
            },
            Band::Soc => {
                let u = layout.control(node);
                for i in 0.. 3 {
                    p[i] = buff_y.get(u + i);
                }
                p[3] = buff_y.get(layout.sigma(node));
            },
            Band::Exp => {
                p[0] = buff_y.get(layout.sigma(node));
                p[1] = if node == 0 {
                    z_lb[0]
                }
                else {
                    buff_y.get(layout.z(node - 1))
                };
            },
        }
    }

    /// Projects a band of a node and updates its dual slices.
    ///
    /// Returns `Ok` with [`ProjStat`], or `Err` if the projection fails.
    /// * `w` is the dual state, overwritten with the projected vector.
    /// * `ys` is the dual accumulator, added with the primal value minus the projected vector.
    pub fn apply(&self, band: Band, node: usize, layout: &Layout,
        buff_y: DevBuf<'_, L::F>, z_lb: &[L::F], z_ub: &[L::F],
        w: DevBuf<'_, L::F>, ys: DevBuf<'_, L::F>) -> Result<ProjStat, SolverError>
    {
        let f0 = L::F::zero();
        let f1 = L::F::one();
        let width = band.width();
        let range = layout.dual_range(band, node);

        let mut p = [f0; 4];
        self.primal(band, node, layout, buff_y, z_lb, z_ub, &mut p);

        let mut acc = [f0; 4];
        let mut x = [f0; 4];
        let (p, acc, x) = (&p[.. width], &mut acc[.. width], &mut x[.. width]);

        for (i, k) in range.clone().enumerate() {
            acc[i] = ys.get(k);
        }

        L::copy(p, x);
        L::add(f1, acc, x);

        let stat = match band {
            Band::ZLower | Band::ZUpper | Band::Pointing => self.rpos.proj(x)?,
            Band::Soc => self.soc.proj(x)?,
            Band::Exp => self.exp.proj(x)?,
        };

        L::add(f1, p, acc);
        L::add(-f1, x, acc);

        if x.iter().chain(acc.iter()).any(|v| !v.is_finite()) {
            log::error!("{:?} of node {}: non-finite dual", band, node);
            return Err(SolverError::NonFinite);
        }

        for (i, k) in range.enumerate() {
            w.set(k, x[i]);
            ys.set(k, acc[i]);
        }

        Ok(stat)
    }
}

//

#[cfg(test)]
mod tests
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;
    use super::*;

    type L = FloatGeneric<f64>;

    fn cells(v: &[f64]) -> [<f64 as GridFloat>::Cell; 22]
    {
        let c: [<f64 as GridFloat>::Cell; 22] = core::array::from_fn(|i| f64::new_cell(*v.get(i).unwrap_or(&0.)));
        c
    }

    fn scales() -> Scales<f64>
    {
        Scales::from_array([0.5, 1., 5., 1., 0.5])
    }

    #[test]
    fn test_scales_check()
    {
        assert!(scales().check().is_ok());

        let mut s = scales();
        s.rho_lo = 6.;
        assert_eq!(s.check(), Err(SolverError::InvalidScale));

        let mut s = scales();
        s.cone_coef = 0.;
        assert_eq!(s.check(), Err(SolverError::InvalidScale));

        let mut s = scales();
        s.z_scale = f64::NAN;
        assert_eq!(s.check(), Err(SolverError::InvalidScale));
    }

    #[test]
    fn test_band_primal()
    {
        let layout = Layout::new(2);
        let bp = BandProj::<L>::new(&scales(), NewtonParam::default());

        let y = &[
            2., 0.5, 0.5,  0., 0., 0., 0., 0., 0.,  3., 1.,
            1., 0., 0.,    0., 0., 0., 0., 0., 0.,  1.5, 0.8,
        ];
        let y_c = cells(y);
        let buff_y = DevBuf::new(&y_c);
        let z_lb = &[0.1, 0.2, 0.3];
        let z_ub = &[9., 2., 1.];

        let mut p = [0.; 4];

        bp.primal(Band::ZLower, 1, &layout, buff_y, z_lb, z_ub, &mut p);
        assert_float_eq!(p[0], 0.8 - 0.3, abs <= 1e-12);

        bp.primal(Band::ZUpper, 0, &layout, buff_y, z_lb, z_ub, &mut p);
        assert_float_eq!(p[0], -1. + 2., abs <= 1e-12);

        bp.primal(Band::Pointing, 0, &layout, buff_y, z_lb, z_ub, &mut p);
        assert_float_eq!(p[0], 2. - 0.5 * 3., abs <= 1e-12);

        bp.primal(Band::Soc, 1, &layout, buff_y, z_lb, z_ub, &mut p);
        assert_float_eq!(p.as_ref(), [1., 0., 0., 1.5].as_ref(), abs_all <= 1e-12);

        // node 0 takes the boundary value for z before it
        bp.primal(Band::Exp, 0, &layout, buff_y, z_lb, z_ub, &mut p);
        assert_float_eq!(&p[.. 2], [3., 0.1].as_ref(), abs_all <= 1e-12);

        bp.primal(Band::Exp, 1, &layout, buff_y, z_lb, z_ub, &mut p);
        assert_float_eq!(&p[.. 2], [1.5, 1.].as_ref(), abs_all <= 1e-12);
    }

    #[test]
    fn test_band_apply_active()
    {
        let layout = Layout::new(1);
        let bp = BandProj::<L>::new(&scales(), NewtonParam::default());

        // z = -0.5 violates z >= z_lb[1] = 0
        let y = &[2., 0.5, 0.5, 0., 0., 0., 0., 0., 0., 3., -0.5];
        let y_c = cells(y);
        let w_c = cells(&[]);
        let ys_c = cells(&[0.25]);
        let (w, ys) = (DevBuf::new(&w_c[.. 9]), DevBuf::new(&ys_c[.. 9]));

        bp.apply(Band::ZLower, 0, &layout, DevBuf::new(&y_c[.. 11]), &[0., 0.], &[0., 2.], w, ys).unwrap();

        // slack = max(-0.5 + 0.25, 0) = 0, ys = 0.25 + (-0.5) - 0
        assert_float_eq!(w.get(0), 0., abs <= 1e-12);
        assert_float_eq!(ys.get(0), -0.25, abs <= 1e-12);
    }

    #[test]
    fn test_band_apply_nonfinite_bound()
    {
        let layout = Layout::new(1);
        let bp = BandProj::<L>::new(&scales(), NewtonParam::default());

        // the slack clamps a NaN to zero while the accumulator would take it
        let y = &[2., 0.5, 0.5, 0., 0., 0., 0., 0., 0., 3., 1.];
        let y_c = cells(y);
        let w_c = cells(&[]);
        let ys_c = cells(&[0.25]);
        let (w, ys) = (DevBuf::new(&w_c[.. 9]), DevBuf::new(&ys_c[.. 9]));

        let rslt = bp.apply(Band::ZLower, 0, &layout, DevBuf::new(&y_c[.. 11]), &[0., f64::NAN], &[0., 2.], w, ys);
        assert_eq!(rslt, Err(SolverError::NonFinite));

        // dual slices left untouched
        assert_eq!(w.get(0), 0.);
        assert_eq!(ys.get(0), 0.25);
    }

    #[test]
    fn test_band_apply_feasible()
    {
        let layout = Layout::new(1);
        let bp = BandProj::<L>::new(&scales(), NewtonParam::default());

        let y = &[2., 0.5, 0.5, 0., 0., 0., 0., 0., 0., 3., 1.];
        let y_c = cells(y);
        let buff_y = DevBuf::new(&y_c[.. 11]);
        let w_c = cells(&[]);
        let ys_c = cells(&[]);
        let (w, ys) = (DevBuf::new(&w_c[.. 9]), DevBuf::new(&ys_c[.. 9]));
        let z_lb = &[0., 0.];
        let z_ub = &[0., 2.];

        let mut p = [0.; 4];
        for band in Band::ALL.iter() {
            let stat = bp.apply(*band, 0, &layout, buff_y, z_lb, z_ub, w, ys).unwrap();
            assert!(!stat.newton);

            // w takes the primal value as is and ys stays zero
            bp.primal(*band, 0, &layout, buff_y, z_lb, z_ub, &mut p);
            for (i, k) in layout.dual_range(*band, 0).enumerate() {
                assert_eq!(w.get(k), p[i]);
                assert_eq!(ys.get(k), 0.);
            }
        }
    }

    #[test]
    fn test_band_apply_nonneg_slack()
    {
        let layout = Layout::new(1);
        let bp = BandProj::<L>::new(&scales(), NewtonParam::default());
        let z_lb = &[0., 0.];
        let z_ub = &[0., 2.];

        for i in 0.. 50 {
            let v = (i as f64 - 25.) * 0.3;
            let y = &[v, -v, 0.5 * v, 0., 0., 0., 0., 0., 0., -0.7 * v, 0.1 * v];
            let y_c = cells(y);
            let w_c = cells(&[]);
            let ys_c = cells(&[0.1 * v, -0.2 * v, 0.3 * v]);
            let (w, ys) = (DevBuf::new(&w_c[.. 9]), DevBuf::new(&ys_c[.. 9]));

            for band in [Band::ZLower, Band::ZUpper, Band::Pointing].iter() {
                bp.apply(*band, 0, &layout, DevBuf::new(&y_c[.. 11]), z_lb, z_ub, w, ys).unwrap();
                let k = layout.dual_range(*band, 0).start;
                assert!(w.get(k) >= 0.);
            }
        }
    }
}
