use std::fmt;

use serde::Serialize;

use crate::data::{CrewId, Roster, SkillCategory, SkillTotals};
use crate::error::VoyageError;
use crate::voyage::simulator::{OTHER_PERCENT, PRIMARY_PERCENT, SECONDARY_PERCENT};

pub const SEAT_COUNT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    FirstOfficer,
    HelmOfficer,
    CommunicationsOfficer,
    Diplomat,
    ChiefSecurityOfficer,
    TacticalOfficer,
    ChiefEngineer,
    Engineer,
    ChiefScienceOfficer,
    DeputyScienceOfficer,
    ChiefMedicalOfficer,
    ShipsCounselor,
}

impl Seat {
    /// Display order for lineup listings.
    pub const ALL: [Seat; SEAT_COUNT] = [
        Self::FirstOfficer,
        Self::HelmOfficer,
        Self::CommunicationsOfficer,
        Self::Diplomat,
        Self::ChiefSecurityOfficer,
        Self::TacticalOfficer,
        Self::ChiefScienceOfficer,
        Self::DeputyScienceOfficer,
        Self::ChiefEngineer,
        Self::Engineer,
        Self::ChiefMedicalOfficer,
        Self::ShipsCounselor,
    ];

    pub const fn skill(self) -> SkillCategory {
        match self {
            Self::FirstOfficer | Self::HelmOfficer => SkillCategory::Command,
            Self::CommunicationsOfficer | Self::Diplomat => SkillCategory::Diplomacy,
            Self::ChiefSecurityOfficer | Self::TacticalOfficer => SkillCategory::Security,
            Self::ChiefEngineer | Self::Engineer => SkillCategory::Engineering,
            Self::ChiefScienceOfficer | Self::DeputyScienceOfficer => SkillCategory::Science,
            Self::ChiefMedicalOfficer | Self::ShipsCounselor => SkillCategory::Medicine,
        }
    }

    /// The two seats of a skill category, senior seat first.
    pub const fn for_skill(skill: SkillCategory) -> [Seat; 2] {
        match skill {
            SkillCategory::Command => [Self::FirstOfficer, Self::HelmOfficer],
            SkillCategory::Diplomacy => [Self::CommunicationsOfficer, Self::Diplomat],
            SkillCategory::Security => [Self::ChiefSecurityOfficer, Self::TacticalOfficer],
            SkillCategory::Engineering => [Self::ChiefEngineer, Self::Engineer],
            SkillCategory::Science => [Self::ChiefScienceOfficer, Self::DeputyScienceOfficer],
            SkillCategory::Medicine => [Self::ChiefMedicalOfficer, Self::ShipsCounselor],
        }
    }

    const fn index(self) -> usize {
        let junior = match self {
            Self::FirstOfficer
            | Self::CommunicationsOfficer
            | Self::ChiefSecurityOfficer
            | Self::ChiefEngineer
            | Self::ChiefScienceOfficer
            | Self::ChiefMedicalOfficer => 0,
            _ => 1,
        };
        self.skill().index() * 2 + junior
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::FirstOfficer => "First Officer",
            Self::HelmOfficer => "Helm Officer",
            Self::CommunicationsOfficer => "Communications Officer",
            Self::Diplomat => "Diplomat",
            Self::ChiefSecurityOfficer => "Chief Security Officer",
            Self::TacticalOfficer => "Tactical Officer",
            Self::ChiefEngineer => "Chief Engineer",
            Self::Engineer => "Engineer",
            Self::ChiefScienceOfficer => "Chief Science Officer",
            Self::DeputyScienceOfficer => "Deputy Science Officer",
            Self::ChiefMedicalOfficer => "Chief Medical Officer",
            Self::ShipsCounselor => "Ship's Counselor",
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Integer-weighted voyage score: primary and secondary scaled by their
/// hazard draw odds relative to an other skill (35/10 and 25/10).
pub fn weighted_score(
    skills: &SkillTotals,
    primary: SkillCategory,
    secondary: SkillCategory,
) -> u64 {
    let weighted: u64 = skills
        .iter()
        .map(|(skill, value)| {
            let weight = if skill == primary {
                PRIMARY_PERCENT
            } else if skill == secondary {
                SECONDARY_PERCENT
            } else {
                OTHER_PERCENT
            };
            u64::from(value) * u64::from(weight)
        })
        .sum();
    weighted / u64::from(OTHER_PERCENT)
}

/// Twelve seats over a roster. A crew member sits in at most one seat and
/// `skill_totals` is always the sum over seated crew.
#[derive(Debug, Clone)]
pub struct Lineup<'r> {
    roster: &'r Roster,
    seats: [Option<CrewId>; SEAT_COUNT],
    totals: SkillTotals,
}

impl<'r> Lineup<'r> {
    pub fn new(roster: &'r Roster) -> Self {
        Self {
            roster,
            seats: [None; SEAT_COUNT],
            totals: SkillTotals::default(),
        }
    }

    pub fn roster(&self) -> &'r Roster {
        self.roster
    }

    /// Seats `crew` in `seat`, first vacating the seat's current occupant and
    /// the crew member's previous seat.
    pub fn assign(&mut self, seat: Seat, crew: CrewId) -> Result<(), VoyageError> {
        let roster = self.roster;
        let record = roster
            .get(crew)
            .ok_or(VoyageError::UnknownCrew { id: crew })?;
        if self.seats[seat.index()] == Some(crew) {
            return Ok(());
        }

        let mut remaining = self.totals;
        if self.seat_of(crew).is_some() {
            remaining -= record.skills;
        }
        if let Some(occupant) = self.occupant(seat).and_then(|id| roster.get(id)) {
            remaining -= occupant.skills;
        }
        let totals = remaining.checked_add(&record.skills).ok_or_else(|| {
            VoyageError::invalid(format!("seating crew {crew} overflows the lineup skill totals"))
        })?;

        if let Some(previous) = self.seat_of(crew) {
            self.vacate(previous);
        }
        self.vacate(seat);

        self.seats[seat.index()] = Some(crew);
        self.totals = totals;
        Ok(())
    }

    /// Empties `seat`, returning who sat there.
    pub fn vacate(&mut self, seat: Seat) -> Option<CrewId> {
        let occupant = self.seats[seat.index()].take()?;
        if let Some(record) = self.roster.get(occupant) {
            self.totals -= record.skills;
        }
        Some(occupant)
    }

    pub fn occupant(&self, seat: Seat) -> Option<CrewId> {
        self.seats[seat.index()]
    }

    pub fn seat_of(&self, crew: CrewId) -> Option<Seat> {
        Seat::ALL
            .into_iter()
            .find(|seat| self.seats[seat.index()] == Some(crew))
    }

    pub fn is_assigned(&self, crew: CrewId) -> bool {
        self.seats.contains(&Some(crew))
    }

    pub fn assigned(&self) -> impl Iterator<Item = CrewId> + '_ {
        self.seats.iter().flatten().copied()
    }

    pub fn filled_seats(&self) -> usize {
        self.seats.iter().flatten().count()
    }

    pub fn skill_totals(&self) -> SkillTotals {
        self.totals
    }

    pub fn voyage_score(&self, primary: SkillCategory, secondary: SkillCategory) -> u64 {
        weighted_score(&self.totals, primary, secondary)
    }

    /// Seat listing in display order with crew names resolved.
    pub fn report(&self) -> Vec<SeatAssignment> {
        Seat::ALL
            .into_iter()
            .map(|seat| {
                let crew = self.occupant(seat);
                SeatAssignment {
                    seat,
                    title: seat.title(),
                    skill: seat.skill(),
                    crew,
                    name: crew
                        .and_then(|id| self.roster.get(id))
                        .map(|record| record.name.clone()),
                }
            })
            .collect()
    }
}

impl fmt::Display for Lineup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = Seat::ALL.iter().map(|seat| seat.title().len()).max().unwrap_or(0);
        for row in self.report() {
            let name = row.name.as_deref().unwrap_or("None");
            writeln!(f, "{:width$}: {name}", row.title)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatAssignment {
    pub seat: Seat,
    pub title: &'static str,
    pub skill: SkillCategory,
    pub crew: Option<CrewId>,
    pub name: Option<String>,
}
