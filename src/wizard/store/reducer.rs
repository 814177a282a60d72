use crate::mvi::Reducer;
use crate::wizard::types::{Audience, WizardStep};

use super::intent::WizardIntent;
use super::state::WizardState;

pub struct WizardReducer;

impl Reducer for WizardReducer {
    type State = WizardState;
    type Intent = WizardIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            WizardIntent::SetTemplate { template } => state.data.template = Some(template),
            WizardIntent::SetBasicInfo { info } => state.data.basic_info = Some(info),
            WizardIntent::SetCreatives { creatives } => state.data.creatives = Some(creatives),
            WizardIntent::SetAudience { audience } => state.data.audience = Some(audience),
            WizardIntent::SetPlanning { planning } => state.data.planning = Some(planning),
            WizardIntent::SetTracking { tracking } => state.data.tracking = Some(tracking),
            WizardIntent::SetValidation { validation } => {
                state.data.validation = Some(validation)
            }
            WizardIntent::CsvImported { import, reach } => {
                let audience = state.data.audience.get_or_insert_with(|| Audience {
                    selected_segments: Vec::new(),
                    custom_filters: Vec::new(),
                    csv_import: None,
                    estimated_reach: None,
                });
                audience.csv_import = Some(import);
                audience.estimated_reach = Some(reach);
            }
            WizardIntent::GoToStep { index } => {
                state.current_step = index.min(WizardStep::ALL.len() - 1);
            }
            WizardIntent::CompleteStep { step } => {
                if !state.completed_steps.contains(&step) {
                    state.completed_steps.push(step);
                }
            }
            WizardIntent::SetStepValidation { step, valid } => {
                state.step_validation.insert(step, valid);
            }
            WizardIntent::SetAiCredits { credits } => state.ai_credits = credits,
            WizardIntent::UseAiCredits { amount } => {
                state.ai_credits = state.ai_credits.saturating_sub(amount);
            }
            WizardIntent::SetGenerating { generating } => state.is_generating = generating,
            WizardIntent::SetGenerationError { error } => {
                state.generation_error = error;
                state.is_generating = false;
            }
            WizardIntent::PublishStarted => {
                if !state.is_publishing {
                    state.is_publishing = true;
                    state.publishing_progress = 0.0;
                    state.error = None;
                }
            }
            WizardIntent::PublishProgress { progress } => {
                state.publishing_progress = progress.clamp(0.0, 100.0);
            }
            WizardIntent::PublishFinished => {
                state.is_publishing = false;
                state.publishing_progress = 0.0;
            }
            WizardIntent::Failed { message } => state.error = Some(message),
            WizardIntent::Saved { at } => state.last_saved = Some(at),
            WizardIntent::ClearError => state.error = None,
            WizardIntent::Reset => {
                state = WizardState {
                    ai_credits: state.ai_credits,
                    ..WizardState::default()
                };
            }
            WizardIntent::Hydrate {
                data,
                step_validation,
                current_step,
                completed_steps,
                ai_credits,
                last_saved,
            } => {
                state.data = data;
                state.step_validation = step_validation;
                state.current_step = current_step.min(WizardStep::ALL.len() - 1);
                state.completed_steps = completed_steps;
                state.ai_credits = ai_credits;
                state.last_saved = last_saved;
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(state: WizardState, intent: WizardIntent) -> WizardState {
        WizardReducer::reduce(state, intent)
    }

    #[test]
    fn go_to_step_is_bounded() {
        let state = reduce(WizardState::default(), WizardIntent::GoToStep { index: 42 });
        assert_eq!(state.current_step, 6);
        assert_eq!(state.step(), WizardStep::Validation);
    }

    #[test]
    fn complete_step_is_idempotent() {
        let step = WizardStep::Audience;
        let once = reduce(WizardState::default(), WizardIntent::CompleteStep { step });
        let twice = reduce(once.clone(), WizardIntent::CompleteStep { step });
        assert_eq!(once, twice);
        assert_eq!(twice.completed_steps, vec![WizardStep::Audience]);
    }

    #[test]
    fn credits_never_go_negative() {
        let state = reduce(WizardState::default(), WizardIntent::UseAiCredits { amount: 3 });
        assert_eq!(state.ai_credits, 7);
        let state = reduce(state, WizardIntent::UseAiCredits { amount: 50 });
        assert_eq!(state.ai_credits, 0);
    }

    #[test]
    fn second_publish_start_is_a_no_op() {
        let started = reduce(WizardState::default(), WizardIntent::PublishStarted);
        let progressed = reduce(started, WizardIntent::PublishProgress { progress: 40.0 });
        let again = reduce(progressed.clone(), WizardIntent::PublishStarted);
        assert_eq!(again, progressed);
    }

    #[test]
    fn failure_leaves_publish_running() {
        let started = reduce(WizardState::default(), WizardIntent::PublishStarted);
        let progressed = reduce(started, WizardIntent::PublishProgress { progress: 20.0 });
        let failed = reduce(
            progressed,
            WizardIntent::Failed {
                message: "bad file".into(),
            },
        );
        assert!(failed.is_publishing);
        assert_eq!(failed.publishing_progress, 20.0);
        assert_eq!(failed.error.as_deref(), Some("bad file"));
    }

    #[test]
    fn reset_keeps_credits() {
        let mut state = reduce(WizardState::default(), WizardIntent::SetAiCredits { credits: 4 });
        state.current_step = 3;
        state.completed_steps.push(WizardStep::Template);
        let state = reduce(state, WizardIntent::Reset);
        assert_eq!(state.ai_credits, 4);
        assert_eq!(state.current_step, 0);
        assert!(state.completed_steps.is_empty());
    }
}
