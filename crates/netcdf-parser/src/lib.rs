//! Container reader for passive-microwave data files.
//!
//! Reads netCDF-4 and HDF5-based containers (NSIDC-0001/0080 `.nc`,
//! AMSR2 HDF-EOS5 `.he5`, AMSR-E `.hdf`) into product-agnostic
//! [`RawField`](tb_common::RawField)s that the normalizer turns into
//! canonical channels.
//!
//! # Implementation Notes
//!
//! Requires libnetcdf built with HDF5 support (libhdf5-dev libnetcdf-dev).
//! Reading AMSR-E HDF4 files additionally needs libnetcdf built with HDF4.

pub mod error;
pub mod native;

pub use error::{NetCdfError, NetCdfResult};
pub use native::{
    convert_attribute, read_all_fields, read_group_fields, silence_hdf5_errors, CfPacking,
    Storage,
};
