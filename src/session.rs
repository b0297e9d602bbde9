//////////////////////////////////////////////////////////////////////
// measurement customization as a state machine driven by discrete
// events. nothing here reads input; callers feed events in.
//
//   SelectingSize --SelectSize--> Customizing --Confirm--> Confirmed
//                                      |  ^
//                                      |  +-- SetMeasurement
//                                      +--Cancel--> Cancelled
//
// Restart goes back to SelectingSize from anywhere.

use std::fmt;

use tracing::debug;

use crate::errors::*;
use crate::measurements::{MeasurementKey, MeasurementSet, check_positive};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SelectSize(String),
    SetMeasurement(MeasurementKey, f64),
    Confirm,
    Cancel,
    Restart,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Event::SelectSize(name) => write!(f, "select size {:}", name),
            Event::SetMeasurement(key, value) => write!(f, "set {:} {:}", key, value),
            Event::Confirm => f.write_str("confirm"),
            Event::Cancel => f.write_str("cancel"),
            Event::Restart => f.write_str("restart"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    SelectingSize,
    Customizing(MeasurementSet),
    Confirmed(MeasurementSet),
    Cancelled,
}

impl Default for Session {
    fn default() -> Self {
        Session::SelectingSize
    }
}

impl Session {

    pub fn new() -> Self {
        Session::SelectingSize
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            Session::SelectingSize => "selecting size",
            Session::Customizing(_) => "customizing",
            Session::Confirmed(_) => "confirmed",
            Session::Cancelled => "cancelled",
        }
    }

    // the working set, if a size has been chosen
    pub fn measurements(&self) -> Option<&MeasurementSet> {
        match self {
            Session::Customizing(ms) | Session::Confirmed(ms) => Some(ms),
            _ => None
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Session::Confirmed(_) | Session::Cancelled)
    }

    // next state; on error self is unchanged
    pub fn apply(&self, event: Event) -> Result<Session> {

        let next = match (self, event) {

            (_, Event::Restart) => Session::SelectingSize,

            (Session::SelectingSize, Event::SelectSize(name)) => {
                Session::Customizing(MeasurementSet::preset(&name)?)
            },

            (Session::Customizing(ms), Event::SetMeasurement(key, value)) => {
                check_positive(key.name(), value)?;
                let mut ms = ms.clone();
                ms.set(key, value);
                Session::Customizing(ms)
            },

            (Session::Customizing(ms), Event::Confirm) => {
                ms.validate()?;
                Session::Confirmed(ms.clone())
            },

            (Session::Customizing(_), Event::Cancel) |
            (Session::SelectingSize, Event::Cancel) => Session::Cancelled,

            (state, event) => {
                return Err(ErrorKind::InvalidTransition(state.state_name().to_string(),
                                                        event.to_string()).into());
            }

        };

        debug!("session: {:} -> {:}", self.state_name(), next.state_name());

        Ok(next)

    }

    // apply events in order, stopping at the first failure
    pub fn run<I>(events: I) -> Result<Session>
    where I: IntoIterator<Item = Event> {

        let mut session = Session::new();

        for event in events {
            session = session.apply(event)?;
        }

        Ok(session)

    }

    pub fn into_confirmed(self) -> Result<MeasurementSet> {
        match self {
            Session::Confirmed(ms) => Ok(ms),
            other => bail!("measurements not confirmed, session is {:}", other.state_name())
        }
    }

}

//////////////////////////////////////////////////////////////////////
