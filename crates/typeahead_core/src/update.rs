use crate::{Effect, Msg, SearchState};

/// Pure update function: applies a message to state and returns any effects.
///
/// Effects are ordered; a `CancelDelay` for the superseded cycle always
/// precedes the `ArmDelay` of its replacement.
pub fn update(mut state: SearchState, msg: Msg) -> (SearchState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryChanged(query) => {
            if !state.is_new_query(&query) {
                return (state, Vec::new());
            }
            let (superseded, cycle) = state.begin_cycle(query);
            let mut effects = Vec::with_capacity(2);
            if let Some(cycle) = superseded {
                effects.push(Effect::CancelDelay { cycle });
            }
            effects.push(Effect::ArmDelay { cycle });
            effects
        }
        Msg::FocusChanged(focused) => {
            state.set_focused(focused);
            Vec::new()
        }
        Msg::DelayElapsed { cycle } => {
            if !state.take_pending(cycle) {
                // Cancelled or superseded after the timer had already woken.
                return (state, Vec::new());
            }
            if state.query().is_empty() {
                state.reset_to_idle();
                Vec::new()
            } else {
                state.start_loading();
                vec![Effect::Fetch {
                    cycle,
                    query: state.query().to_owned(),
                }]
            }
        }
        Msg::QueryResolved { cycle, result } => {
            if state.is_latest(cycle) {
                state.settle(result);
            }
            Vec::new()
        }
        Msg::Teardown => match state.abandon_cycles() {
            Some(cycle) => vec![Effect::CancelDelay { cycle }],
            None => Vec::new(),
        },
    };

    (state, effects)
}
