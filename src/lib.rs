#![cfg_attr(not(test), no_std)]

pub mod calendar;
pub mod clock;
pub mod display;
pub mod drivers;
pub mod faces;
pub mod http;
pub mod retained;
pub mod sensors;
pub mod sync;
