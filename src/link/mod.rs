//! Serial link to the fog node.
//!
//! | Module      | Responsibility                                   |
//! |-------------|--------------------------------------------------|
//! | `framing`   | delimiter-framed text records                    |
//! | `handshake` | pairing vocabulary (`whoareyou`, `OK`, `EOS`...) |
//! | `transport` | byte channel trait                               |
//! | `bridge`    | transport activity → control events              |

pub mod bridge;
pub mod framing;
pub mod handshake;
pub mod transport;
