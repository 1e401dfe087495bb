pub mod align;
pub mod border;
pub mod length;
pub mod parsers;

pub use align::{HAlign, VAlign};
pub use border::{BorderSpec, BorderStyle, LineKind};
pub use length::{Length, LengthContext, Side, Sides, Unit};
pub use parsers::StyleParseError;
