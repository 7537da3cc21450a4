use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Error type returned by [`Settings::validate`](crate::solver::Settings::validate).
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("alpha must lie in the open interval (0,2)")]
    AlphaOutOfRange,
    #[error("eps must be nonnegative")]
    NegativeEps,
    #[error("rho_x must be nonnegative")]
    NegativeRhoX,
    #[error("undet_tol must be positive")]
    BadUndetTol,
    #[error("scale must be positive")]
    BadScale,
}

/// Solver options.
///
/// Defaults are configured for moderate accuracy on well-scaled problems.
/// A [`SettingsBuilder`](crate::solver::SettingsBuilder) is derived, so
/// settings can be assembled field by field:
///
/// ```no_run
/// use splitcone::solver::SettingsBuilder;
///
/// let settings = SettingsBuilder::<f64>::default()
///     .eps(1e-7)
///     .verbose(false)
///     .build()
///     .unwrap();
/// ```

#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings<T: FloatT> {
    ///maximum number of iterations
    #[builder(default = "2500")]
    pub max_iter: u32,

    ///convergence tolerance for residuals and duality gap
    #[builder(default = "(1e-5).as_T()")]
    pub eps: T,

    ///over-relaxation parameter, in (0,2)
    #[builder(default = "(1.8).as_T()")]
    pub alpha: T,

    ///regularization of the x block in the subspace projection
    #[builder(default = "(1e-3).as_T()")]
    pub rho_x: T,

    ///enable diagonal equilibration of the problem data
    #[builder(default = "true")]
    pub normalize: bool,

    ///overall scaling applied to the equilibrated data
    #[builder(default = "T::one()")]
    pub scale: T,

    ///minimum equilibration scaling allowed
    #[builder(default = "(1e-4).as_T()")]
    pub equilibrate_min_scaling: T,

    ///maximum equilibration scaling allowed
    #[builder(default = "(1e+4).as_T()")]
    pub equilibrate_max_scaling: T,

    ///start the iteration from the current solution
    #[builder(default = "false")]
    pub warm_start: bool,

    ///verbose printing
    #[builder(default = "true")]
    pub verbose: bool,

    ///threshold below which a terminal iterate is declared indeterminate
    #[builder(default = "(1e-9).as_T()")]
    pub undet_tol: T,

    ///use the direct LDL' subspace solver; otherwise conjugate gradient
    #[builder(default = "true")]
    pub direct: bool,

    ///rate at which the conjugate gradient tolerance tightens per iteration
    #[builder(default = "(2.0).as_T()")]
    pub cg_rate: T,

    ///best tolerance requested of the conjugate gradient subsolver
    #[builder(default = "(1e-9).as_T()")]
    pub cg_best_tol: T,
}

impl<T> Default for Settings<T>
where
    T: FloatT,
{
    fn default() -> Settings<T> {
        SettingsBuilder::<T>::default().build().unwrap()
    }
}

// pre build checker (for auto-validation when using the builder)

/// Automatic pre-build settings validation
impl<T> SettingsBuilder<T>
where
    T: FloatT,
{
    fn validate(&self) -> Result<(), String> {
        if let Some(alpha) = self.alpha {
            if alpha <= T::zero() || alpha >= (2.0).as_T() {
                return Err("alpha must lie in the open interval (0,2)".to_string());
            }
        }
        if let Some(eps) = self.eps {
            if eps < T::zero() {
                return Err("eps must be nonnegative".to_string());
            }
        }
        if let Some(rho_x) = self.rho_x {
            if rho_x < T::zero() {
                return Err("rho_x must be nonnegative".to_string());
            }
        }
        Ok(())
    }
}

// post build checker (for ad-hoc validation, e.g. when fields were
// assigned directly rather than through the builder).  This is also the
// check applied during problem validation.

/// Manual post-build settings validation
impl<T> Settings<T>
where
    T: FloatT,
{
    /// Checks that the settings are valid
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.alpha <= T::zero() || self.alpha >= (2.0).as_T() {
            return Err(SettingsError::AlphaOutOfRange);
        }
        if self.eps < T::zero() {
            return Err(SettingsError::NegativeEps);
        }
        if self.rho_x < T::zero() {
            return Err(SettingsError::NegativeRhoX);
        }
        if self.undet_tol <= T::zero() {
            return Err(SettingsError::BadUndetTol);
        }
        if self.scale <= T::zero() {
            return Err(SettingsError::BadScale);
        }
        Ok(())
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    Settings::<f64>::default().validate().unwrap();

    // fail on alpha at either open boundary
    assert!(SettingsBuilder::<f64>::default().alpha(0.0).build().is_err());
    assert!(SettingsBuilder::<f64>::default().alpha(2.0).build().is_err());

    // eps = 0 is allowed; the solver then runs to max_iter
    assert!(SettingsBuilder::<f64>::default().eps(0.0).build().is_ok());

    // fail on negative regularization
    assert!(SettingsBuilder::<f64>::default()
        .rho_x(-1e-3)
        .build()
        .is_err());

    let mut settings = Settings::<f64>::default();
    settings.undet_tol = 0.0;
    assert!(matches!(
        settings.validate(),
        Err(SettingsError::BadUndetTol)
    ));
}
