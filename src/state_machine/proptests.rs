//! Property-based tests for the session state machine
//!
//! These drive the pure transition function with arbitrary event sequences
//! and replay the effects onto a model transcript, checking:
//! - at most one exchange is ever pending
//! - every reply lands immediately after the user message that caused it
//! - the greeting is seeded once and always stays first
//! - blank utterances never mutate anything

use super::*;
use crate::locale::Language;
use crate::transcript::Role;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_language() -> impl Strategy<Value = Language> {
    prop_oneof![Just(Language::En), Just(Language::Ar)]
}

fn arb_utterance() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z?! ]{1,30}",
        Just(String::new()),
        "[ \t\n]{1,5}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-zA-Z ]{1,20}".prop_map(|greeting| Event::Initialize { greeting }),
        (arb_utterance(), arb_language())
            .prop_map(|(text, language)| Event::UserMessage { text, language }),
        "[a-zA-Z ]{1,20}".prop_map(|text| Event::AssistantReply { text }),
        "[a-zA-Z ]{0,20}".prop_map(|text| Event::Suggest { text }),
    ]
}

// ============================================================================
// Model
// ============================================================================

#[derive(Default)]
struct Model {
    state: SessionState,
    messages: Vec<(Role, String)>,
    input: String,
    in_flight: usize,
}

impl Model {
    fn apply(&mut self, event: Event) -> Result<(), TransitionError> {
        let result = transition(self.state, event)?;
        self.state = result.new_state;
        for effect in result.effects {
            match effect {
                Effect::AppendMessage { role, text } => {
                    if role == Role::Assistant && self.in_flight > 0 {
                        self.in_flight -= 1;
                    }
                    self.messages.push((role, text));
                }
                Effect::SetInput { text } => self.input = text,
                Effect::RequestResponse { .. } => self.in_flight += 1,
                Effect::NotifyStatus { .. } => {}
            }
        }
        Ok(())
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_single_flight(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut model = Model::default();
        for event in events {
            let _ = model.apply(event);
            prop_assert!(model.in_flight <= 1);
            prop_assert_eq!(model.in_flight == 1, model.state == SessionState::Pending);
        }
    }

    #[test]
    fn prop_replies_follow_their_message(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut model = Model::default();
        for event in events {
            let _ = model.apply(event);
        }
        // After the greeting, messages alternate user/assistant
        for (i, (role, _)) in model.messages.iter().enumerate().skip(1) {
            let expected = if i % 2 == 1 { Role::User } else { Role::Assistant };
            prop_assert_eq!(*role, expected);
        }
    }

    #[test]
    fn prop_greeting_seeded_once(
        greetings in proptest::collection::vec("[a-z]{1,10}", 1..5),
        events in proptest::collection::vec(arb_event(), 0..20),
    ) {
        let mut model = Model::default();
        let first = greetings[0].clone();
        for greeting in greetings {
            model.apply(Event::Initialize { greeting }).unwrap();
        }
        prop_assert_eq!(model.messages.len(), 1);
        for event in events {
            let _ = model.apply(event);
        }
        prop_assert_eq!(&model.messages[0], &(Role::Assistant, first));
    }

    #[test]
    fn prop_blank_utterance_is_inert(
        text in "[ \t\n]{0,6}",
        language in arb_language(),
        state in prop_oneof![Just(SessionState::Idle), Just(SessionState::Pending)],
    ) {
        let result = transition(state, Event::UserMessage { text, language });
        prop_assert!(result.is_err());
    }

    #[test]
    fn prop_pending_accepts_only_the_reply(
        text in "[a-zA-Z]{1,20}",
        greeting in "[a-zA-Z ]{1,20}",
        language in arb_language(),
    ) {
        let result = transition(SessionState::Pending, Event::UserMessage { text: text.clone(), language });
        prop_assert_eq!(result.unwrap_err(), TransitionError::ExchangePending);

        // Re-initializing while pending changes nothing
        let result = transition(SessionState::Pending, Event::Initialize { greeting }).unwrap();
        prop_assert_eq!(result.new_state, SessionState::Pending);
        prop_assert!(result.effects.is_empty());

        // Only the reply moves the exchange back to idle
        let result = transition(SessionState::Pending, Event::AssistantReply { text: text.clone() }).unwrap();
        prop_assert_eq!(result.new_state, SessionState::Idle);
        prop_assert_eq!(
            result.effects,
            vec![
                Effect::append_assistant(text),
                Effect::NotifyStatus { status: ExchangeStatus::Idle },
            ]
        );
    }
}
