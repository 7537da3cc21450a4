use super::*;
use std::ops::Range;

// -------------------------------------
// composite cone set
// -------------------------------------

/// An ordered product of primitive cones, with total dimension equal to
/// the row dimension of the constraint matrix.
pub struct ConeSet<T: FloatT = f64> {
    cones: Vec<SupportedCone<T>>,

    //user specification, retained for reporting
    pub(crate) types: Vec<SupportedConeT>,

    //overall size of the composite cone
    numel: usize,

    //ranges for the indices of the constituent cones
    pub(crate) rng_cones: Vec<Range<usize>>,
}

impl<T> ConeSet<T>
where
    T: FloatT,
{
    pub fn new(types: &[SupportedConeT]) -> Self {
        // make an internal copy to protect from user modification
        let types = types.to_vec();
        let cones: Vec<SupportedCone<T>> = types.iter().map(|t| make_cone(*t)).collect();

        let numel = cones.iter().map(|c| c.numel()).sum();

        //ranges for the subvectors associated with each cone
        let mut rng_cones = Vec::with_capacity(cones.len());
        let mut start = 0;
        for cone in cones.iter() {
            let stop = start + cone.numel();
            rng_cones.push(start..stop);
            start = stop;
        }

        Self {
            cones,
            types,
            numel,
            rng_cones,
        }
    }

    /// total dimension over all cones
    pub fn numel(&self) -> usize {
        self.numel
    }

    /// number of cone blocks
    pub fn len(&self) -> usize {
        self.cones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cones.is_empty()
    }

    /// projects the length-m dual variable onto 𝒦* block by block
    pub(crate) fn project_duals(&self, z: &mut [T]) {
        assert_eq!(z.len(), self.numel);

        for (cone, rng) in std::iter::zip(&self.cones, &self.rng_cones) {
            cone.project_dual(&mut z[rng.clone()]);
        }
    }

    // dimension tallies for header printing and equilibration

    pub(crate) fn zero_dims(&self) -> usize {
        self._dims_of(|t| matches!(t, SupportedConeT::ZeroConeT(_)))
    }

    pub(crate) fn nonnegative_dims(&self) -> usize {
        self._dims_of(|t| matches!(t, SupportedConeT::NonnegativeConeT(_)))
    }

    pub(crate) fn soc_dims(&self) -> usize {
        self._dims_of(|t| matches!(t, SupportedConeT::SecondOrderConeT(_)))
    }

    pub(crate) fn soc_count(&self) -> usize {
        self.types
            .iter()
            .filter(|t| matches!(t, SupportedConeT::SecondOrderConeT(_)))
            .count()
    }

    fn _dims_of(&self, pred: impl Fn(&SupportedConeT) -> bool) -> usize {
        self.types
            .iter()
            .filter(|t| pred(t))
            .map(|t| t.nvars())
            .sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_coneset_ranges() {
        let cones = ConeSet::<f64>::new(&[
            SupportedConeT::ZeroConeT(2),
            SupportedConeT::NonnegativeConeT(3),
            SupportedConeT::SecondOrderConeT(3),
        ]);

        assert_eq!(cones.numel(), 8);
        assert_eq!(cones.len(), 3);
        assert_eq!(cones.rng_cones, vec![0..2, 2..5, 5..8]);
        assert_eq!(cones.zero_dims(), 2);
        assert_eq!(cones.nonnegative_dims(), 3);
        assert_eq!(cones.soc_dims(), 3);
        assert_eq!(cones.soc_count(), 1);
    }

    #[test]
    fn test_coneset_projection() {
        let cones = ConeSet::<f64>::new(&[
            SupportedConeT::ZeroConeT(1),
            SupportedConeT::NonnegativeConeT(2),
            SupportedConeT::SecondOrderConeT(3),
        ]);

        let mut z = vec![-7., -1., 2., -5., 3., 4.];
        cones.project_duals(&mut z);

        // zero cone rows are left free, nonnegative rows clamped,
        // and the polar-cone SOC block maps to the origin
        assert_eq!(z, vec![-7., 0., 2., 0., 0., 0.]);
    }
}
