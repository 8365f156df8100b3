/// Flat driver options, as collected from the command line.
///
/// Not every field is meaningful for every scheme; [`SchemeParams`] picks
/// the ones the selected scheme uses.
///
/// [`SchemeParams`]: super::SchemeParams
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub scheme: String,
    pub version: String,
    /// Bond dimension.
    pub chi: usize,
    /// Maximal number of RG steps.
    pub rg_steps: usize,

    /// Intermediate bond dimension of the block-tensor step.
    pub chi_m: usize,
    /// First inner bond dimension of the block-tensor step.
    pub chi_i: usize,
    /// Second inner bond dimension of the block-tensor step.
    pub chi_ii: usize,

    /// Cube-filtering bond dimension.
    pub chis: usize,
    /// Initial SVD truncation of the cube environment.
    pub chienv: usize,
    pub epsilon: f64,
    pub cube_off: bool,

    /// Loop-filtering bond dimension.
    pub chi_ms: usize,
    /// Initial SVD truncation of the loop environment.
    pub chi_menv: usize,
    pub epsilon_m: f64,
    pub loop_off: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            scheme: "hotrg3d".to_string(),
            version: "base".to_string(),
            chi: 2,
            rg_steps: 12,
            chi_m: 2,
            chi_i: 2,
            chi_ii: 2,
            chis: 4,
            chienv: 16,
            epsilon: 1e-6,
            cube_off: false,
            chi_ms: 4,
            chi_menv: 16,
            epsilon_m: 1e-6,
            loop_off: false,
        }
    }
}
