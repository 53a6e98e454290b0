//! Wire types shared between the session engine and the WebSocket transport:
//! identifiers, the `{ event, data, ack? }` envelope, and the stable error
//! taxonomy.

pub mod error;
pub mod messages;
pub mod types;

pub use error::GameError;
pub use types::{ConnectionId, HostId, Pin, QuestionId, TeamId};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pin_well_formed_rejects_non_digits() {
        assert!(Pin::is_well_formed("1234"));
        assert!(!Pin::is_well_formed("12a4"));
        assert!(!Pin::is_well_formed("123"));
        assert!(!Pin::is_well_formed("12345"));
    }

    proptest! {
        #[test]
        fn pin_from_code_is_always_four_digits(code in 1000u16..=9999u16) {
            let pin = Pin::from_code(code);
            prop_assert_eq!(pin.as_str().len(), 4);
            prop_assert!(Pin::is_well_formed(pin.as_str()));
        }
    }
}
