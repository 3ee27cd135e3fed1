//! seven-offset timelock schedule
//!
//! offsets are seconds relative to escrow creation time t0; each window
//! is half-open [threshold, inf). crossing a cancellation threshold
//! opens cancellation, it never closes withdrawal

use serde::{Deserialize, Serialize};

use crate::error::{EscrowError, Result};

/// which leg of the swap an escrow sits on
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Side {
    Src,
    Dst,
}

/// the window open at a given instant
///
/// ordered by onset within each side, so phase gating is a plain
/// comparison against the first acceptable phase
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// no window open yet, chain finality still settling
    FinalityLock,
    SrcPrivateWithdraw,
    SrcPublicWithdraw,
    SrcCancel,
    SrcPublicCancel,
    DstPrivateWithdraw,
    DstPublicWithdraw,
    DstCancel,
}

/// monotone timelock offsets, validated at construction
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeLocks {
    pub src_withdrawal: u64,
    pub src_public_withdrawal: u64,
    pub src_cancellation: u64,
    pub src_public_cancellation: u64,
    pub dst_withdrawal: u64,
    pub dst_public_withdrawal: u64,
    pub dst_cancellation: u64,
}

impl TimeLocks {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        src_withdrawal: u64,
        src_public_withdrawal: u64,
        src_cancellation: u64,
        src_public_cancellation: u64,
        dst_withdrawal: u64,
        dst_public_withdrawal: u64,
        dst_cancellation: u64,
    ) -> Result<Self> {
        let locks = Self {
            src_withdrawal,
            src_public_withdrawal,
            src_cancellation,
            src_public_cancellation,
            dst_withdrawal,
            dst_public_withdrawal,
            dst_cancellation,
        };

        let src_ordered = locks.src_withdrawal < locks.src_public_withdrawal
            && locks.src_public_withdrawal < locks.src_cancellation
            && locks.src_cancellation < locks.src_public_cancellation;
        let dst_ordered = locks.dst_withdrawal < locks.dst_public_withdrawal
            && locks.dst_public_withdrawal < locks.dst_cancellation;

        if !src_ordered || !dst_ordered {
            return Err(EscrowError::InvalidTimeLocks);
        }
        Ok(locks)
    }

    /// window open at `now` for an escrow created at `t0`
    pub fn phase_at(&self, now: u64, t0: u64, side: Side) -> Phase {
        let elapsed = now.saturating_sub(t0);
        match side {
            Side::Src => {
                if elapsed >= self.src_public_cancellation {
                    Phase::SrcPublicCancel
                } else if elapsed >= self.src_cancellation {
                    Phase::SrcCancel
                } else if elapsed >= self.src_public_withdrawal {
                    Phase::SrcPublicWithdraw
                } else if elapsed >= self.src_withdrawal {
                    Phase::SrcPrivateWithdraw
                } else {
                    Phase::FinalityLock
                }
            }
            Side::Dst => {
                if elapsed >= self.dst_cancellation {
                    Phase::DstCancel
                } else if elapsed >= self.dst_public_withdrawal {
                    Phase::DstPublicWithdraw
                } else if elapsed >= self.dst_withdrawal {
                    Phase::DstPrivateWithdraw
                } else {
                    Phase::FinalityLock
                }
            }
        }
    }
}
