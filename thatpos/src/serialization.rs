use std::io::{Read, Write};

use failure::Error;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::config::Config;
use crate::eval::{AccuracyReport, ClassificationReport};

pub trait TomlRead {
    fn from_toml_read<R>(read: R) -> Result<Config, Error>
    where
        R: Read;
}

impl TomlRead for Config {
    fn from_toml_read<R>(mut read: R) -> Result<Self, Error>
    where
        R: Read,
    {
        let mut data = String::new();
        read.read_to_string(&mut data)?;
        let config: Config = toml::from_str(&data)?;
        Ok(config)
    }
}

/// Reports that are written as indented JSON.
pub trait JsonWrite {
    fn to_json_write<W>(&self, write: &mut W) -> Result<(), Error>
    where
        W: Write;
}

macro_rules! json_write {
    ($type: ty) => {
        impl JsonWrite for $type {
            fn to_json_write<W>(&self, write: &mut W) -> Result<(), Error>
            where
                W: Write,
            {
                let formatter = PrettyFormatter::with_indent(b"    ");
                let mut serializer = Serializer::with_formatter(&mut *write, formatter);
                self.serialize(&mut serializer)?;
                Ok(())
            }
        }
    };
}

json_write!(AccuracyReport);
json_write!(ClassificationReport);
