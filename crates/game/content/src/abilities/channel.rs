use skirmish_core::{
    AbilityBehavior, AbilityContext, ContinuationError, Progress, StatusApplication, Step,
};
use tracing::warn;

use crate::catalog::StatusSpec;
use crate::error::ContentError;

/// Applies a status to the caster for as long as the control is held.
///
/// The status is removed when the channel ends, through release or after
/// `max_steps` ticks. If the caster already carried the status, the channel only
/// adds a stack and takes that stack back when it ends. Without a control there is
/// nothing to hold and the ability does nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub status: StatusSpec,
    pub max_steps: Option<u32>,
    hold: Hold,
}

/// What the running channel contributed to its status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Hold {
    #[default]
    Nothing,
    Applied,
    Stack,
}

impl Channel {
    pub fn new(status: StatusSpec) -> Self {
        Self {
            status,
            max_steps: None,
            hold: Hold::Nothing,
        }
    }

    pub fn with_max_steps(mut self, steps: u32) -> Self {
        self.max_steps = Some(steps);
        self
    }
}

impl AbilityBehavior for Channel {
    fn start_use(&mut self, ctx: &mut AbilityContext<'_>) -> bool {
        if !ctx.is_held() {
            return false;
        }
        // A re-use replaces the running continuation without ending it.
        if self.hold != Hold::Nothing {
            return true;
        }

        let caster = ctx.entity().id();
        let before = ctx
            .entity()
            .status(&self.status.name)
            .map(|status| status.stack_count());
        let applied = self
            .status
            .build_from(Some(caster))
            .and_then(|status| {
                ctx.entity_mut()
                    .add_status(status)
                    .map_err(ContentError::from)
            });
        match applied {
            Ok(StatusApplication::Added) => {
                self.hold = Hold::Applied;
                true
            }
            Ok(StatusApplication::Stacked { stacks }) => {
                // At the stack cap nothing was added, so there is nothing to take back.
                if before.is_some_and(|before| stacks > before) {
                    self.hold = Hold::Stack;
                }
                true
            }
            Err(err) => {
                warn!(
                    caster = %caster,
                    status = %self.status.name,
                    error = %err,
                    "channel not started"
                );
                false
            }
        }
    }

    fn continue_use(
        &mut self,
        ctx: &mut AbilityContext<'_>,
        progress: &Progress,
    ) -> Result<Step, ContinuationError> {
        let exhausted = self.max_steps.is_some_and(|max| progress.step >= max);
        if exhausted || !ctx.is_held() {
            Ok(Step::Complete)
        } else {
            Ok(Step::Yield)
        }
    }

    fn end_use(&mut self, ctx: &mut AbilityContext<'_>) {
        let name = &self.status.name;
        match std::mem::take(&mut self.hold) {
            Hold::Nothing => {}
            Hold::Applied => {
                if let Err(err) = ctx.entity_mut().remove_status(name) {
                    warn!(status = %name, error = %err, "channel status not removed");
                }
            }
            Hold::Stack => {
                let stacks = ctx.entity().status(name).map(|status| status.stack_count());
                if let Some(stacks) = stacks {
                    ctx.entity_mut().set_stack_count(name, stacks - 1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{Ability, AiControl, Controller, Entity, EntityId, EntityStats};

    use super::*;
    use crate::catalog::ComponentSpec;

    fn warded() -> Controller {
        let haste = StatusSpec::new("haste", 10.0)
            .with_component(ComponentSpec::Movespeed { factor: 2.0 });
        let ability = Ability::new("sprint", 1.0, 0, Channel::new(haste).with_max_steps(5))
            .expect("valid ability")
            .with_cooldown_completed()
            .with_control(AiControl::new());
        Controller::new(Entity::new(
            EntityId(1),
            EntityStats::builder().movespeed(4.0).build(),
        ))
        .with_ability(ability)
        .expect("slot available")
    }

    fn movespeed(controller: &Controller) -> f64 {
        controller.entity().stats().movespeed.value()
    }

    #[test]
    fn status_lasts_while_held() {
        let mut controller = warded();
        controller.control_mut("sprint").expect("has control").press();

        controller.tick(0.1);
        assert!(controller.entity().has_status("haste"));
        assert_eq!(movespeed(&controller), 8.0);

        controller.control_mut("sprint").expect("has control").release();
        controller.tick(0.1);
        controller.tick(0.1);
        assert!(!controller.entity().has_status("haste"));
        assert_eq!(movespeed(&controller), 4.0);
    }

    #[test]
    fn max_steps_end_the_channel() {
        let mut controller = warded();
        controller.control_mut("sprint").expect("has control").press();

        for _ in 0..8 {
            controller.tick(0.1);
        }
        assert!(!controller.entity().has_status("haste"));
        assert!(!controller.abilities()[0].in_use());
    }

    #[test]
    fn ending_keeps_a_status_it_only_stacked() {
        let mut controller = warded();
        let haste = StatusSpec::new("haste", 10.0)
            .with_stacks(3, -1)
            .with_component(ComponentSpec::Movespeed { factor: 2.0 });
        let status = haste.build().expect("valid status");
        controller.entity_mut().add_status(status).expect("applies");

        controller.control_mut("sprint").expect("has control").press();
        controller.tick(0.1);
        let stacks = |c: &Controller| c.entity().status("haste").map(|s| s.stack_count());
        assert_eq!(stacks(&controller), Some(2));

        controller.control_mut("sprint").expect("has control").release();
        controller.tick(0.1);
        controller.tick(0.1);
        assert!(!controller.abilities()[0].in_use());
        assert_eq!(stacks(&controller), Some(1));
        assert_eq!(movespeed(&controller), 8.0);
    }
}
