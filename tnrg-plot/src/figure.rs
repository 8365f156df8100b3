use tnrg_core::{ReflectionSector, ScalingTable, SpinSector, StepDimensions};

/// Best-known dimension of the energy density operator ε.
pub const EPSILON_BEST: f64 = 1.412_625;

/// Best-known dimension of the spin operator σ.
pub const SIGMA_BEST: f64 = 0.518_148_9;

/// Dimension of the stress tensor.
const STRESS_TENSOR: f64 = 3.0;

/// Horizontal offset of each reflection sector relative to its RG step.
fn sector_offset(reflection: ReflectionSector) -> f64 {
    match reflection {
        ReflectionSector::R000 => 0.0,
        ReflectionSector::R100 => 0.15,
        ReflectionSector::R010 => 0.2,
        ReflectionSector::R001 => 0.25,
        ReflectionSector::R110 => 0.3,
        ReflectionSector::R101 => 0.35,
        ReflectionSector::R011 => 0.4,
    }
}

/// Whether a marker is drawn as a primary operator or as a descendant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Primary,
    Descendant,
}

/// Per-index jitter and emphasis of the markers in one group of sectors.
struct GroupStyle {
    jitter: &'static [f64],
    emphasis: &'static [Emphasis],
}

impl GroupStyle {
    fn len(&self) -> usize {
        self.jitter.len()
    }
}

use Emphasis::{Descendant as D, Primary as P};

const EVEN_000: GroupStyle = GroupStyle {
    jitter: &[0.0, 0.0, -0.03, 0.03, -0.03, 0.0, 0.03],
    emphasis: &[P, P, P, P, D, D, D],
};
const EVEN_100: GroupStyle = GroupStyle {
    jitter: &[0.0, -0.01, 0.01],
    emphasis: &[D, D, D],
};
const EVEN_110: GroupStyle = GroupStyle {
    jitter: &[0.0, 0.0],
    emphasis: &[P, D],
};
const ODD_000: GroupStyle = GroupStyle {
    jitter: &[0.0, -0.03, 0.0, 0.03],
    emphasis: &[P, D, D, D],
};
const ODD_100: GroupStyle = GroupStyle {
    jitter: &[0.0, -0.03, 0.0, 0.03],
    emphasis: &[D, D, D, D],
};
const ODD_110: GroupStyle = GroupStyle {
    jitter: &[0.0],
    emphasis: &[D],
};

fn group_style(spin: SpinSector, reflection: ReflectionSector) -> &'static GroupStyle {
    match (spin, reflection.odd_reflections()) {
        (SpinSector::Even, 0) => &EVEN_000,
        (SpinSector::Even, 1) => &EVEN_100,
        (SpinSector::Even, _) => &EVEN_110,
        (SpinSector::Odd, 0) => &ODD_000,
        (SpinSector::Odd, 1) => &ODD_100,
        (SpinSector::Odd, _) => &ODD_110,
    }
}

/// One plotted scaling dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub emphasis: Emphasis,
}

/// Dashed horizontal line at a best-known value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceLine {
    pub y: f64,
    pub emphasis: Emphasis,
}

/// Text placed at a point of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// One spin-flip sector of the figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub spin: SpinSector,
    pub label: &'static str,
    pub markers: Vec<Marker>,
    pub references: Vec<ReferenceLine>,
    pub annotations: Vec<Annotation>,
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
}

/// Relative errors of the two relevant operators at one RG step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepErrors {
    pub rg_step: usize,
    /// Relative error of ε, if the even `000` sector has two dimensions.
    pub epsilon: Option<f64>,
    /// Relative error of σ, if the odd `000` sector has one.
    pub sigma: Option<f64>,
}

/// The full two-panel figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub chi: usize,
    pub rg_steps: Vec<usize>,
    pub even: Panel,
    pub odd: Panel,
}

/// Returns `|estimate - best| / best`.
#[must_use]
pub fn relative_error(estimate: f64, best: f64) -> f64 {
    (estimate - best).abs() / best
}

fn percent(error: f64) -> String {
    format!("{:.1}%", error * 100.0)
}

impl Figure {
    /// Lays out `table` for bond dimension `chi`.
    #[must_use]
    pub fn from_table(table: &ScalingTable, chi: usize) -> Self {
        let rg_steps = table.rg_steps.clone();
        let x_range = x_range(&rg_steps);

        let mut even = Panel {
            spin: SpinSector::Even,
            label: "Even sector",
            markers: markers(table, SpinSector::Even),
            references: [
                (EPSILON_BEST, P),
                (2.412_625, D),
                (STRESS_TENSOR, P),
                (3.412_625, D),
                (4.0, D),
            ]
            .into_iter()
            .map(|(y, emphasis)| ReferenceLine { y, emphasis })
            .collect(),
            annotations: Vec::new(),
            x_range,
            y_range: [-0.1, 3.4],
        };

        let mut odd = Panel {
            spin: SpinSector::Odd,
            label: "Odd sector",
            markers: markers(table, SpinSector::Odd),
            references: [0.0, 1.0, 2.0, 3.0]
                .into_iter()
                .map(|shift| ReferenceLine {
                    y: SIGMA_BEST + shift,
                    emphasis: if shift == 0.0 { P } else { D },
                })
                .collect(),
            annotations: Vec::new(),
            x_range,
            y_range: [-0.1, 3.0],
        };

        for (step_errors, (rg_step, step)) in errors(table).iter().zip(table.iter()) {
            let x = rg_step as f64 + 0.06;
            if let Some(error) = step_errors.epsilon {
                let y = step.get(ReflectionSector::R000, SpinSector::Even)[1];
                even.annotations.push(Annotation {
                    x,
                    y,
                    text: percent(error),
                });
            }
            if let Some(error) = step_errors.sigma {
                let y = step.get(ReflectionSector::R000, SpinSector::Odd)[0];
                odd.annotations.push(Annotation {
                    x,
                    y,
                    text: percent(error),
                });
            }
        }

        if let (Some(&first), Some(&last)) = (rg_steps.first(), rg_steps.last()) {
            let first = first as f64;
            even.annotations.extend([
                label(first - 0.06, EPSILON_BEST + 0.1, "ε"),
                label(first - 0.15, STRESS_TENSOR + 0.1, "T_kk"),
                label(
                    first + sector_offset(ReflectionSector::R011) + 0.03,
                    STRESS_TENSOR + 0.1,
                    "T_mn",
                ),
                label(last as f64 - 1.0, 0.5, &format!("Bond dimension χ={chi}")),
            ]);
            odd.annotations.push(label(first - 0.06, SIGMA_BEST + 0.1, "σ"));
        }

        Self {
            chi,
            rg_steps,
            even,
            odd,
        }
    }

    /// Relative errors of ε and σ at every RG step.
    #[must_use]
    pub fn errors(table: &ScalingTable) -> Vec<StepErrors> {
        errors(table)
    }

    /// Both panels, even first.
    #[must_use]
    pub fn panels(&self) -> [&Panel; 2] {
        [&self.even, &self.odd]
    }
}

fn label(x: f64, y: f64, text: &str) -> Annotation {
    Annotation {
        x,
        y,
        text: text.to_string(),
    }
}

fn errors(table: &ScalingTable) -> Vec<StepErrors> {
    table
        .iter()
        .map(|(rg_step, step)| StepErrors {
            rg_step,
            epsilon: step
                .get(ReflectionSector::R000, SpinSector::Even)
                .get(1)
                .map(|&e| relative_error(e, EPSILON_BEST)),
            sigma: step
                .get(ReflectionSector::R000, SpinSector::Odd)
                .first()
                .map(|&s| relative_error(s, SIGMA_BEST)),
        })
        .collect()
}

fn markers(table: &ScalingTable, spin: SpinSector) -> Vec<Marker> {
    table
        .iter()
        .flat_map(|(rg_step, step)| step_markers(rg_step, step, spin))
        .collect()
}

fn step_markers(rg_step: usize, step: &StepDimensions, spin: SpinSector) -> Vec<Marker> {
    let mut out = Vec::new();
    for reflection in ReflectionSector::ALL {
        let style = group_style(spin, reflection);
        let base = rg_step as f64 + sector_offset(reflection);
        let values = step.get(reflection, spin);

        for (k, &y) in values.iter().take(style.len()).enumerate() {
            out.push(Marker {
                x: base + style.jitter[k],
                y,
                emphasis: style.emphasis[k],
            });
        }
    }
    out
}

fn x_range(rg_steps: &[usize]) -> [f64; 2] {
    match (rg_steps.first(), rg_steps.last()) {
        (Some(&first), Some(&last)) if first == last => [first as f64 - 1.0, first as f64 + 1.0],
        (Some(&first), Some(&last)) => [first as f64 - 0.2, last as f64 + 0.5],
        _ => [0.0, 1.0],
    }
}
