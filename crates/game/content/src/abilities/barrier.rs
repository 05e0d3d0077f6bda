use skirmish_core::{AbilityBehavior, AbilityContext, ContinuationError, Progress, Step};

/// Makes the caster invincible for `steps` ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Barrier {
    pub steps: u32,
    raised: bool,
}

impl Barrier {
    pub fn new(steps: u32) -> Self {
        Self {
            steps,
            raised: false,
        }
    }

    pub fn is_raised(&self) -> bool {
        self.raised
    }
}

impl AbilityBehavior for Barrier {
    fn start_use(&mut self, ctx: &mut AbilityContext<'_>) -> bool {
        // A re-use replaces the running continuation without ending it.
        if !self.raised {
            self.raised = true;
            ctx.entity_mut().set_invincible(true);
        }
        true
    }

    fn continue_use(
        &mut self,
        _ctx: &mut AbilityContext<'_>,
        progress: &Progress,
    ) -> Result<Step, ContinuationError> {
        if progress.step < self.steps {
            Ok(Step::Yield)
        } else {
            Ok(Step::Complete)
        }
    }

    fn end_use(&mut self, ctx: &mut AbilityContext<'_>) {
        if self.raised {
            self.raised = false;
            ctx.entity_mut().set_invincible(false);
        }
    }
}
