//! Porter-Duff blend translation.
//!
//! Blends are described by four 6-bit coefficients
//!
//! ```text
//! C = k1 * C2 + k2 * C1
//! A = k3 * A2 + k4 * A1
//! ```
//!
//! where operand 1 is the source and operand 2 the background. The accelerator only exposes one
//! factor per side and derives the alpha factor from it, so the alpha coefficients must belong to
//! the same equivalence class as the colour coefficients.

mod code;
mod resolve;
mod symbolic;
mod table;

pub use code::{BlendCode, BlendSpec, GlobalAlphaMode};
pub use resolve::{BlendConfig, FactorConfig, FactorMode, resolve_blend};
pub use symbolic::{Factor, Side, decode_coefficient};
