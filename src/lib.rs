//Copyright (C) 2017-2018 Baidu, Inc. All Rights Reserved.
//
//Redistribution and use in source and binary forms, with or without
//modification, are permitted provided that the following conditions
//are met:
//
// * Redistributions of source code must retain the above copyright
//   notice, this list of conditions and the following disclaimer.
//
// * Redistributions in binary form must reproduce the above copyright
//   notice, this list of conditions and the following disclaimer in
//   the documentation and/or other materials provided with the
//   distribution.
//
// * Neither the name of Baidu, Inc., nor the names of its
//   contributors may be used to endorse or promote products derived
//   from this software without specific prior written permission.
//
//THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS
//"AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT
//LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
//A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT
//OWNER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
//SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT
//LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; Loss OF USE,
//DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY
//THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT
//(INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
//OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Experiment tools for gradient boosting on sparse text data.
//!
//! The data format is one record per line:
//!
//! ```text
//! <label> <bias|weight> <idx0>:<val0> <idx1>:<val1> ...
//! ```
//!
//! 1. [`sampler`]: label-stratified streaming subsampling with a row budget and
//!    optional per-class weight rescaling.
//! 2. [`input`]: densification into [`gbdt`] data vectors.
//! 3. [`benchmark`]: fit a [`gbdt::gradient_boost::GBDT`] model and report fit
//!    time with RMSE, MAE or AUC.
//! 4. [`ranker`]: rank features by their one-way ANOVA F statistic.
//! 5. [`generator`]: synthetic logistic data.
//!
//! # Example
//! ```rust
//! use gbdt_tools::config::SamplerConfig;
//! use gbdt_tools::sampler::sample;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let input = "-1 2.0 0:1\n1 1.0 3:0.5\n";
//! let mut cfg = SamplerConfig::new(10, 1.0);
//! cfg.set_weight_multipliers(1.0, 0.5);
//! let mut out: Vec<u8> = Vec::new();
//! sample(input.as_bytes(), &mut out, &cfg, StdRng::seed_from_u64(0)).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "-1.0 1.0 0:1\n1.0 1.0 3:0.5\n");
//! ```

#![allow(clippy::ptr_arg)]

extern crate rand;
extern crate serde;
#[macro_use]
extern crate serde_derive;

pub mod benchmark;
pub mod cli;
pub mod config;
pub mod errors;
pub mod generator;
pub mod input;
pub mod ranker;
pub mod record;
pub mod sampler;
