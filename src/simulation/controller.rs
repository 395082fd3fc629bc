//! Gait selection policy.
//!
//! Each tick the controller walks an ordered rule list and takes the first
//! rule whose predicate holds. A rule names the gait to drive and the turn to
//! replay into the dead-reckoning estimate. The only memory carried between
//! ticks is the estimate itself and the terminal `done` flag.

use tracing::{debug, info, warn};

use crate::simulation::config::ControllerConfig;
use crate::simulation::dead_reckoning::{DeadReckoning, Turn};
use crate::simulation::error::ControllerError;
use crate::simulation::gait::{GaitKind, GaitLibrary};
use crate::simulation::locomotion::{step_oscillator, ActuatorCommand, CpgNetwork, OscillatorNetwork};
use crate::simulation::observation::Observation;
use crate::simulation::vision::{OmmatidiaLayout, VisionFeatureExtractor, VisualFeatures};

/// Inputs a rule predicate can look at.
pub struct RuleContext<'a> {
    pub observation: &'a Observation,
    pub features: &'a VisualFeatures,
    pub estimator: &'a DeadReckoning,
    pub config: &'a ControllerConfig,
}

/// One entry of the priority list.
pub struct Rule {
    pub name: &'static str,
    predicate: fn(&RuleContext) -> bool,
    pub gait: GaitKind,
    pub turn: Option<Turn>,
}

impl Rule {
    #[must_use]
    pub fn matches(&self, ctx: &RuleContext) -> bool {
        (self.predicate)(ctx)
    }
}

fn back_home(ctx: &RuleContext) -> bool {
    ctx.observation.reached_odour
        && ctx.estimator.distance_from_origin() < ctx.config.return_radius
}

fn homing_origin_left(ctx: &RuleContext) -> bool {
    ctx.observation.reached_odour && ctx.estimator.bearing_to_origin() > 0.0
}

fn homing(ctx: &RuleContext) -> bool {
    ctx.observation.reached_odour
}

fn obstacle_left(ctx: &RuleContext) -> bool {
    ctx.features.left_count() > ctx.config.object_count_trigger
}

fn obstacle_right(ctx: &RuleContext) -> bool {
    ctx.features.right_count() > ctx.config.object_count_trigger
}

fn odor_stronger_left(ctx: &RuleContext) -> bool {
    let (left, right) = ctx.observation.primary_odor();
    left > right
}

fn always(_: &RuleContext) -> bool {
    true
}

/// Evaluated top to bottom; the last rule always matches.
pub static RULES: [Rule; 7] = [
    Rule {
        name: "returned",
        predicate: back_home,
        gait: GaitKind::Stop,
        turn: None,
    },
    Rule {
        name: "homing-origin-left",
        predicate: homing_origin_left,
        gait: GaitKind::TurnRight,
        turn: Some(Turn::Right),
    },
    Rule {
        name: "homing-origin-right",
        predicate: homing,
        gait: GaitKind::TurnLeft,
        turn: Some(Turn::Left),
    },
    Rule {
        name: "avoid-left-obstacle",
        predicate: obstacle_left,
        gait: GaitKind::TurnRight,
        turn: Some(Turn::Right),
    },
    Rule {
        name: "avoid-right-obstacle",
        predicate: obstacle_right,
        gait: GaitKind::TurnLeft,
        turn: Some(Turn::Left),
    },
    Rule {
        name: "odor-left",
        predicate: odor_stronger_left,
        gait: GaitKind::TurnLeft,
        turn: Some(Turn::Left),
    },
    Rule {
        name: "odor-right",
        predicate: always,
        gait: GaitKind::TurnRight,
        turn: Some(Turn::Right),
    },
];

/// Outcome of one pass over [`RULES`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Index into [`RULES`].
    pub rule: usize,
    pub gait: GaitKind,
    pub turn: Option<Turn>,
    pub features: VisualFeatures,
}

impl Decision {
    #[must_use]
    pub fn rule_name(&self) -> &'static str {
        RULES[self.rule].name
    }
}

/// What the controller hands back to the host for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub command: ActuatorCommand,
    pub gait: GaitKind,
}

/// Picks a gait per tick from vision, odor and the dead-reckoning estimate.
pub struct NavigationController<N = CpgNetwork> {
    config: ControllerConfig,
    network: N,
    gaits: GaitLibrary,
    vision: VisionFeatureExtractor,
    estimator: DeadReckoning,
    done: bool,
    last_gait: GaitKind,
    last_rule: Option<usize>,
    tick_count: u64,
}

impl NavigationController<CpgNetwork> {
    /// Controller driving a [`CpgNetwork`] built from `config.timestep` and
    /// `config.seed`, with the built-in ommatidia layout.
    ///
    /// # Errors
    /// [`ControllerError::Config`] when the configuration does not validate.
    pub fn new(config: ControllerConfig) -> Result<Self, ControllerError> {
        let network = CpgNetwork::new(config.timestep, config.seed);
        Self::with_parts(config, network, OmmatidiaLayout::hexagonal())
    }
}

impl<N: OscillatorNetwork> NavigationController<N> {
    /// Controller over a caller-supplied network and coordinate table.
    ///
    /// # Errors
    /// [`ControllerError::Config`] when the configuration does not validate.
    pub fn with_parts(
        config: ControllerConfig,
        network: N,
        layout: OmmatidiaLayout,
    ) -> Result<Self, ControllerError> {
        config.validate()?;
        Ok(Self {
            gaits: GaitLibrary::new(config.turn_intensity),
            vision: VisionFeatureExtractor::new(layout),
            estimator: DeadReckoning::new(
                config.heading_change_per_step,
                config.position_change_per_step,
            ),
            config,
            network,
            done: false,
            last_gait: GaitKind::Default,
            last_rule: None,
            tick_count: 0,
        })
    }

    /// Evaluates the rule list without touching any state.
    ///
    /// # Errors
    /// Rejects observations with the wrong vision or odor shape.
    pub fn decide(&self, observation: &Observation) -> Result<Decision, ControllerError> {
        observation.validate()?;
        let features = self
            .vision
            .extract(&observation.vision, self.config.object_threshold);
        let ctx = RuleContext {
            observation,
            features: &features,
            estimator: &self.estimator,
            config: &self.config,
        };
        let rule = RULES
            .iter()
            .position(|rule| rule.matches(&ctx))
            .unwrap_or(RULES.len() - 1);
        Ok(Decision {
            rule,
            gait: RULES[rule].gait,
            turn: RULES[rule].turn,
            features,
        })
    }

    /// Runs one control tick: select a gait, step the oscillator network with
    /// it, and replay the issued turn into the estimate.
    ///
    /// Once stopped, the controller keeps driving the stop gait without
    /// re-evaluating the rules.
    ///
    /// # Errors
    /// Rejects malformed observations; no state changes in that case.
    pub fn compute_action(&mut self, observation: &Observation) -> Result<Action, ControllerError> {
        if self.done {
            return Ok(self.drive(GaitKind::Stop));
        }

        let decision = self.decide(observation).inspect_err(|err| {
            warn!(tick = self.tick_count, %err, "rejected observation");
        })?;

        if self.last_rule != Some(decision.rule) {
            debug!(
                tick = self.tick_count,
                rule = decision.rule_name(),
                gait = decision.gait.label(),
                left_objects = decision.features.left_count(),
                right_objects = decision.features.right_count(),
                "rule change"
            );
            self.last_rule = Some(decision.rule);
        }

        if decision.gait == GaitKind::Stop {
            self.done = true;
            let position = self.estimator.position();
            info!(
                tick = self.tick_count,
                x = position.x,
                y = position.y,
                "estimated return to start, stopping"
            );
        }

        let action = self.drive(decision.gait);
        if let Some(turn) = decision.turn {
            self.estimator.record_turn(turn);
        }
        Ok(action)
    }

    fn drive(&mut self, gait: GaitKind) -> Action {
        let command = step_oscillator(&mut self.network, self.gaits.get(gait), self.config.command);
        self.last_gait = gait;
        self.tick_count += 1;
        Action { command, gait }
    }

    /// Whether the stop rule has fired this episode. The observation is not
    /// consulted; the flag only changes in [`compute_action`](Self::compute_action)
    /// and [`reset`](Self::reset).
    #[must_use]
    pub fn is_done(&self, _observation: &Observation) -> bool {
        self.done
    }

    /// Starts a new episode.
    pub fn reset(&mut self) {
        info!(ticks = self.tick_count, done = self.done, "controller reset");
        self.network.reset();
        self.estimator.reset();
        self.done = false;
        self.last_gait = GaitKind::Default;
        self.last_rule = None;
        self.tick_count = 0;
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub fn gaits(&self) -> &GaitLibrary {
        &self.gaits
    }

    #[must_use]
    pub fn estimator(&self) -> &DeadReckoning {
        &self.estimator
    }

    pub fn estimator_mut(&mut self) -> &mut DeadReckoning {
        &mut self.estimator
    }

    #[must_use]
    pub fn network(&self) -> &N {
        &self.network
    }

    /// Gait driven on the most recent tick, `Default` before the first one.
    #[must_use]
    pub fn last_gait(&self) -> GaitKind {
        self.last_gait
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_rule_is_catch_all() {
        let observation = Observation::clear_view(0.0, 0.0, false);
        let features = VisualFeatures::default();
        let estimator = DeadReckoning::new(0.1, 0.1);
        let config = ControllerConfig::default();
        let ctx = RuleContext {
            observation: &observation,
            features: &features,
            estimator: &estimator,
            config: &config,
        };
        assert!(RULES[RULES.len() - 1].matches(&ctx));
    }

    #[test]
    fn test_only_stop_rule_has_no_turn() {
        for rule in &RULES {
            assert_eq!(rule.turn.is_none(), rule.gait == GaitKind::Stop, "{}", rule.name);
        }
    }
}
