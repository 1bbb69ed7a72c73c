// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Error taxonomy shared by the data pipeline

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("request exceeded the client timeout")]
    Timeout,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("settlement period {0} outside 1..=48")]
    InvalidPeriod(u32),
}

pub type DataResult<T> = std::result::Result<T, DataError>;
