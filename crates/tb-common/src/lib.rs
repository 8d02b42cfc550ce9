//! Common types shared across the pm-tb-data workspace.

pub mod channel;
pub mod dataset;
pub mod error;
pub mod field;
pub mod grid;
pub mod hemisphere;

pub use channel::{ChannelKey, Polarization};
pub use dataset::{SourceMetadata, TbDataset, TbVariable};
pub use error::{TbError, TbResult};
pub use field::{AttrValue, Attributes, RawField, RawValues};
pub use grid::Grid;
pub use hemisphere::Hemisphere;
