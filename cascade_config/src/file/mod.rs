//! Loading individual configuration fragments from disk.
//!
//! [`FragmentLoader`] probes a base path against an ordered list of
//! extensions, reads the first file that exists and hands it to the
//! [`FileLoader`] registered for that extension in a [`LoaderRegistry`].

mod error;
mod formats;
mod fragment;
mod helpers;
mod interpolate;
mod registry;

pub use formats::{FileLoader, JsonLoader, TomlLoader};
#[cfg(feature = "json5")]
pub use formats::Json5Loader;
#[cfg(feature = "yaml")]
pub use formats::YamlLoader;
pub use fragment::{FragmentLoader, FragmentRequest, NAMED_EXPORT, SelectedFile, empty_mapping};
pub use interpolate::interpolate;
pub use registry::LoaderRegistry;

#[cfg(test)]
mod tests;
