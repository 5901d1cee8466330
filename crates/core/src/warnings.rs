// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;

/// Why a slot could not be filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningReason {
    /// A band member declared they cannot serve.
    UnavailableDeclared,
    /// A band member never answered the availability request.
    UnavailableUnconfirmed,
    /// The in-band role has no matching role in the band ministry.
    RoleMissing,
    /// No eligible member was available for a derived role.
    NoCandidate,
    /// No band could be selected for the celebration.
    BandMissing,
    /// The selected band has no members.
    BandEmpty,
}

impl WarningReason {
    /// Returns the stable machine code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnavailableDeclared => "unavailable_declared",
            Self::UnavailableUnconfirmed => "unavailable_unconfirmed",
            Self::RoleMissing => "role_missing",
            Self::NoCandidate => "no_candidate",
            Self::BandMissing => "band_missing",
            Self::BandEmpty => "band_empty",
        }
    }

    /// Returns the message shown to schedulers.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::UnavailableDeclared => "Membro da banda declarou indisponibilidade",
            Self::UnavailableUnconfirmed => "Membro da banda nao confirmou disponibilidade",
            Self::RoleMissing => "Papel da banda nao encontrado no ministerio Bandas",
            Self::NoCandidate => "Nenhum membro disponivel",
            Self::BandMissing => "Nenhuma banda configurada para a celebracao",
            Self::BandEmpty => "Banda selecionada nao possui membros",
        }
    }
}

impl std::fmt::Display for WarningReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// An unfillable-slot diagnostic.
///
/// Role fields are absent when the failure is structural (no band, empty
/// band) or the role could not be resolved. Ministry fields are absent only
/// for warnings raised outside any ministry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationWarning {
    pub celebration_id: i64,
    pub celebration_starts_at: OffsetDateTime,
    pub ministry_id: Option<i64>,
    pub ministry_name: Option<String>,
    pub role_id: Option<i64>,
    pub role_name: Option<String>,
    pub reason: WarningReason,
}

/// Append-only list of warnings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningCollector {
    warnings: Vec<GenerationWarning>,
}

impl WarningCollector {
    /// Creates an empty collector.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    pub fn push(&mut self, warning: GenerationWarning) {
        self.warnings.push(warning);
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Consumes the collector, yielding warnings in emission order.
    #[must_use]
    pub fn into_warnings(self) -> Vec<GenerationWarning> {
        self.warnings
    }
}
