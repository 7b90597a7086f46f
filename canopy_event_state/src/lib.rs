// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Event State: stateful interaction processors for Canopy elements.
//!
//! Processors here sit on top of `canopy_responder`: they register listeners
//! on one element of an [`ElementTree`](canopy_responder::tree::ElementTree)
//! and turn a stream of primitive events into a higher-level interaction.
//!
//! - [`drag`]: arm on pointer down, start a host drag once the pointer moves
//!   far enough, and forward host drag callbacks to a policy object.
//!
//! Policy and host integration are traits, so the same mechanics serve any
//! kind of draggable content.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod drag;
