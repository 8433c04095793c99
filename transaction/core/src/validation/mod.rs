// Copyright (c) 2024 Botho Foundation

//! Validation routines for a kernel transaction

mod error;
mod validate;

pub use self::{
    error::{TransactionValidationError, TransactionValidationResult},
    validate::{
        validate, validate_extra, validate_inputs, validate_number_of_inputs,
        validate_number_of_outputs, validate_output, validate_references, validate_spending,
        SpentOutput,
    },
};
