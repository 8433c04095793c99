// Copyright (c) 2024 Botho Foundation

#![deny(unsafe_code)]

//! Low-level types shared by Mixin kernel transactions: amounts, scripts,
//! output types and the consensus constants.

mod amount;
mod output_type;
mod script;

pub mod constants;

pub use crate::{
    amount::{AmountError, Integer, PRECISION, UNITS_PER_WHOLE},
    output_type::{OutputType, UnknownOutputType},
    script::{Script, ScriptError},
};
