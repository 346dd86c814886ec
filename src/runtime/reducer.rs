//! Reducer trait and composition primitives.

use super::action::Action;
use super::effect::Effect;
use super::state::FeatureState;

/// Reducer transforms state based on actions.
///
/// The reducer is the only place where state transitions happen. It must be
/// total over its action enum and deterministic: the same state and action
/// always yield the same next state and an effect of the same shape. Work
/// with side effects is only described by the returned [`Effect`].
pub trait Reducer: Send + Sync + 'static {
    /// The state type this reducer operates on.
    type State: FeatureState;

    /// The action type this reducer handles.
    type Action: Action;

    /// Mutate `state` in place for `action` and describe follow-up work.
    fn reduce(&self, state: &mut Self::State, action: Self::Action) -> Effect<Self::Action>;
}

/// Focus from a parent state onto one child slice.
pub struct Lens<P, C> {
    get: fn(&P) -> &C,
    get_mut: fn(&mut P) -> &mut C,
}

impl<P, C> Clone for Lens<P, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, C> Copy for Lens<P, C> {}

impl<P, C> Lens<P, C> {
    pub const fn new(get: fn(&P) -> &C, get_mut: fn(&mut P) -> &mut C) -> Self {
        Self { get, get_mut }
    }

    pub fn get<'a>(&self, parent: &'a P) -> &'a C {
        (self.get)(parent)
    }

    pub fn get_mut<'a>(&self, parent: &'a mut P) -> &'a mut C {
        (self.get_mut)(parent)
    }
}

/// Pairs the extraction of a child action from a parent action with the
/// embedding back into the parent enum.
pub struct CasePath<P, C> {
    extract: fn(P) -> Option<C>,
    embed: fn(C) -> P,
}

impl<P, C> Clone for CasePath<P, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, C> Copy for CasePath<P, C> {}

impl<P, C> CasePath<P, C> {
    pub const fn new(extract: fn(P) -> Option<C>, embed: fn(C) -> P) -> Self {
        Self { extract, embed }
    }

    pub fn extract(&self, parent: P) -> Option<C> {
        (self.extract)(parent)
    }

    pub fn embed(&self, child: C) -> P {
        (self.embed)(child)
    }
}

/// Embeds a child reducer into a parent state/action shape.
///
/// Actions that do not match the child case are ignored. The child's effect
/// is re-wrapped so its results re-enter at the parent level.
pub struct Scope<R: Reducer, PS, PA> {
    child: R,
    lens: Lens<PS, R::State>,
    case: CasePath<PA, R::Action>,
}

impl<R: Reducer, PS, PA> Scope<R, PS, PA> {
    pub fn new(child: R, lens: Lens<PS, R::State>, case: CasePath<PA, R::Action>) -> Self {
        Self { child, lens, case }
    }
}

impl<R, PS, PA> Reducer for Scope<R, PS, PA>
where
    R: Reducer,
    PS: FeatureState,
    PA: Action,
{
    type State = PS;
    type Action = PA;

    fn reduce(&self, state: &mut PS, action: PA) -> Effect<PA> {
        let Some(child_action) = self.case.extract(action) else {
            return Effect::none();
        };
        let embed = self.case.embed;
        self.child
            .reduce(self.lens.get_mut(state), child_action)
            .map(embed)
    }
}

/// Runs two reducers over the same state, left first, merging their effects.
pub struct Combine<L, R> {
    left: L,
    right: R,
}

impl<L, R> Reducer for Combine<L, R>
where
    L: Reducer,
    R: Reducer<State = L::State, Action = L::Action>,
{
    type State = L::State;
    type Action = L::Action;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) -> Effect<Self::Action> {
        let left = self.left.reduce(state, action.clone());
        let right = self.right.reduce(state, action);
        Effect::merge([left, right])
    }
}

pub trait ReducerExt: Reducer + Sized {
    fn combine<R>(self, other: R) -> Combine<Self, R>
    where
        R: Reducer<State = Self::State, Action = Self::Action>,
    {
        Combine {
            left: self,
            right: other,
        }
    }
}

impl<R: Reducer> ReducerExt for R {}
