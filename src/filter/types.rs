//! Pageable filter shapes
//!
//! The cursor (virtual list view) index only exists for a closed set of
//! filter shapes. Each shape is a variant here; anything else goes through
//! the bounded scan.

use crate::types::{RequestState, RequestType};
use std::fmt;

/// A filter shape eligible for cursor-positioned search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageableFilter {
    /// `(requeststate=*)`
    AnyState,
    /// `(requesttype=enrollment)`
    Enrollment,
    /// `(requesttype=recovery)`
    Recovery,
    /// `(requeststate=canceled)`
    Canceled,
    /// `(&(requeststate=canceled)(requesttype=enrollment))`
    CanceledEnrollment,
    /// `(&(requeststate=canceled)(requesttype=recovery))`
    CanceledRecovery,
    /// `(requeststate=rejected)`
    Rejected,
    /// `(&(requeststate=rejected)(requesttype=enrollment))`
    RejectedEnrollment,
    /// `(&(requeststate=rejected)(requesttype=recovery))`
    RejectedRecovery,
    /// `(requeststate=complete)`
    Complete,
    /// `(&(requeststate=complete)(requesttype=enrollment))`
    CompleteEnrollment,
    /// `(&(requeststate=complete)(requesttype=recovery))`
    CompleteRecovery,
}

impl PageableFilter {
    /// Every pageable shape, in classification order
    pub const ALL: [PageableFilter; 12] = [
        Self::AnyState,
        Self::Enrollment,
        Self::Recovery,
        Self::Canceled,
        Self::CanceledEnrollment,
        Self::CanceledRecovery,
        Self::Rejected,
        Self::RejectedEnrollment,
        Self::RejectedRecovery,
        Self::Complete,
        Self::CompleteEnrollment,
        Self::CompleteRecovery,
    ];

    /// Canonical filter expression of this shape
    pub fn expression(self) -> &'static str {
        match self {
            Self::AnyState => "(requeststate=*)",
            Self::Enrollment => "(requesttype=enrollment)",
            Self::Recovery => "(requesttype=recovery)",
            Self::Canceled => "(requeststate=canceled)",
            Self::CanceledEnrollment => "(&(requeststate=canceled)(requesttype=enrollment))",
            Self::CanceledRecovery => "(&(requeststate=canceled)(requesttype=recovery))",
            Self::Rejected => "(requeststate=rejected)",
            Self::RejectedEnrollment => "(&(requeststate=rejected)(requesttype=enrollment))",
            Self::RejectedRecovery => "(&(requeststate=rejected)(requesttype=recovery))",
            Self::Complete => "(requeststate=complete)",
            Self::CompleteEnrollment => "(&(requeststate=complete)(requesttype=enrollment))",
            Self::CompleteRecovery => "(&(requeststate=complete)(requesttype=recovery))",
        }
    }

    /// State constraint of this shape (`None` = any state)
    pub fn state(self) -> Option<RequestState> {
        match self {
            Self::AnyState | Self::Enrollment | Self::Recovery => None,
            Self::Canceled | Self::CanceledEnrollment | Self::CanceledRecovery => {
                Some(RequestState::Canceled)
            }
            Self::Rejected | Self::RejectedEnrollment | Self::RejectedRecovery => {
                Some(RequestState::Rejected)
            }
            Self::Complete | Self::CompleteEnrollment | Self::CompleteRecovery => {
                Some(RequestState::Complete)
            }
        }
    }

    /// Type constraint of this shape (`None` = any type)
    pub fn request_type(self) -> Option<RequestType> {
        match self {
            Self::Enrollment
            | Self::CanceledEnrollment
            | Self::RejectedEnrollment
            | Self::CompleteEnrollment => Some(RequestType::Enrollment),
            Self::Recovery
            | Self::CanceledRecovery
            | Self::RejectedRecovery
            | Self::CompleteRecovery => Some(RequestType::Recovery),
            Self::AnyState | Self::Canceled | Self::Rejected | Self::Complete => None,
        }
    }

    /// Classify a raw filter expression
    ///
    /// Case-insensitive exact match against [`PageableFilter::ALL`]; no
    /// whitespace normalization and no semantic parsing.
    pub fn classify(filter: &str) -> Option<PageableFilter> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.expression().eq_ignore_ascii_case(filter))
    }
}

impl fmt::Display for PageableFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.expression())
    }
}

/// Whether `filter` can be served by a cursor-positioned search
pub fn is_pageable(filter: &str) -> bool {
    PageableFilter::classify(filter).is_some()
}
