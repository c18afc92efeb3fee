//=====================================================
// File: dispatch/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Ordered handler matching for fetchers and commands
// Objective: Select the first handler whose shape fits an event, bind its
//            arguments left to right and backtrack on binding failures
//=====================================================

mod arg;
mod handler;

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::event::Event;
use crate::interpreter::{Attempt, BindingFailure, ScenarioError, ScenarioResult};
use crate::value::{Address, Value};
use crate::world::World;

pub use arg::{Arg, BoundArgs, Resolver};
pub use handler::{Command, CommandFn, FetchFn, Fetcher, Handler};

use arg::ArgSource;
use handler::Body;

//=====================================================
// Section 1.0 - Binding
//=====================================================

/// Outcome of binding one candidate. `Failed` moves on to the next handler,
/// `Fatal` stops the search.
enum BindError {
    Failed(BindingFailure),
    Fatal(ScenarioError),
}

impl From<BindingFailure> for BindError {
    fn from(failure: BindingFailure) -> Self {
        BindError::Failed(failure)
    }
}

fn resolve_arg(
    arg: &Arg,
    resolver: &Resolver,
    world: &World,
    event: &Event,
) -> Result<Value, BindError> {
    resolver(world, event).map_err(|err| {
        if err.is_fatal() {
            BindError::Fatal(err)
        } else {
            BindError::Failed(BindingFailure::Resolve {
                arg: arg.name.clone(),
                source: Box::new(err),
            })
        }
    })
}

//Function: bind_args
//Purpose: Walk the arg descriptors left to right over the remaining elements
//Inputs: args, world, rest (elements not used for the handler name)
//Returns: bound values plus the number of elements consumed
fn bind_args(
    args: &[Arg],
    world: &World,
    rest: &[Event],
) -> Result<(BoundArgs, usize), BindError> {
    let mut bound = BoundArgs::default();
    let mut cursor = 0;

    for arg in args {
        let resolver = match &arg.source {
            ArgSource::Slot(slot) => {
                let value = world.implicit(slot).ok_or_else(|| {
                    BindingFailure::ImplicitUnavailable {
                        arg: arg.name.clone(),
                        slot: slot.clone(),
                    }
                })?;
                bound.insert(&arg.name, value);
                continue;
            }
            ArgSource::Event(resolver) => resolver,
        };

        let value = if arg.variadic {
            let captured = &rest[cursor..];
            cursor = rest.len();
            if captured.is_empty() && arg.default.is_some() {
                arg.default.clone().unwrap_or(Value::Nothing)
            } else if arg.mapped {
                let mut values = Vec::with_capacity(captured.len());
                for (index, event) in captured.iter().enumerate() {
                    match resolver(world, event) {
                        Ok(value) => values.push(value),
                        Err(err) if err.is_fatal() => return Err(BindError::Fatal(err)),
                        Err(err) => {
                            return Err(BindError::Failed(BindingFailure::Element {
                                arg: arg.name.clone(),
                                index,
                                source: Box::new(err),
                            }));
                        }
                    }
                }
                Value::Array(values)
            } else {
                resolve_arg(arg, resolver, world, &Event::Seq(captured.to_vec()))?
            }
        } else if let Some(event) = rest.get(cursor) {
            cursor += 1;
            resolve_arg(arg, resolver, world, event)?
        } else if let Some(default) = &arg.default {
            default.clone()
        } else if arg.nullable {
            Value::Nothing
        } else {
            return Err(BindingFailure::MissingArg {
                arg: arg.name.clone(),
            }
            .into());
        };
        bound.insert(&arg.name, value);
    }

    Ok((bound, cursor))
}

//=====================================================
// Section 2.0 - Selection
//=====================================================

/// The leaf handler chosen for an event together with its bound arguments.
pub struct Selection<'h, F> {
    pub handler: &'h Handler<F>,
    pub effect: &'h F,
    pub args: BoundArgs,
}

/// Elements left for argument binding once the name token is taken out.
fn remaining<'e, F>(handler: &Handler<F>, elements: &'e [Event]) -> Cow<'e, [Event]> {
    if handler.is_catch_all() {
        return Cow::Borrowed(elements);
    }
    let position = handler.name_position;
    if position == 0 {
        Cow::Borrowed(&elements[1..])
    } else {
        let mut rest = elements.to_vec();
        rest.remove(position);
        Cow::Owned(rest)
    }
}

fn named_at<'e, F>(handler: &Handler<F>, elements: &'e [Event]) -> Option<&'e str> {
    elements
        .get(handler.name_position)
        .and_then(Event::as_token)
}

fn try_handler<'h, F>(
    handler: &'h Handler<F>,
    world: &World,
    elements: &[Event],
) -> Result<Selection<'h, F>, BindError> {
    let rest = remaining(handler, elements);
    let (bound, consumed) = bind_args(&handler.args, world, &rest)?;

    match &handler.body {
        Body::Effect(effect) => {
            if consumed < rest.len() {
                return Err(BindingFailure::TooManyArgs {
                    count: rest.len() - consumed,
                    first: rest[consumed].to_string(),
                }
                .into());
            }
            Ok(Selection {
                handler,
                effect,
                args: bound,
            })
        }
        Body::Composite(sub) => {
            if consumed >= rest.len() {
                return Err(BindingFailure::MissingSubExpression {
                    handler: handler.label.clone(),
                }
                .into());
            }
            let inner = Event::Seq(rest[consumed..].to_vec());
            match select(&handler.label, sub, world, &inner) {
                Ok(mut selection) => {
                    selection.args.prepend(bound);
                    Ok(selection)
                }
                Err(err) if err.is_fatal() => Err(BindError::Fatal(err)),
                Err(err) => Err(BindError::Failed(BindingFailure::Sub {
                    source: Box::new(err),
                })),
            }
        }
    }
}

//Function: select
//Purpose: Find the first handler that binds against `event`
//Inputs: kind (label for diagnostics), handlers, world, event
//Returns: the selected leaf handler, NoMatch, or a fatal resolver error
pub fn select<'h, F>(
    kind: &str,
    handlers: &'h [Handler<F>],
    world: &World,
    event: &Event,
) -> ScenarioResult<Selection<'h, F>> {
    let elements = event.elements();
    let mut attempted = Vec::new();

    let named = handlers.iter().filter(|handler| {
        !handler.is_catch_all()
            && named_at(handler, elements).is_some_and(|token| handler.matches_name(token))
    });
    let catch_alls = handlers.iter().filter(|handler| handler.is_catch_all());

    for handler in named.chain(catch_alls) {
        match try_handler(handler, world, elements) {
            Ok(selection) => {
                debug!(kind, handler = %handler.label, event = %event, "handler matched");
                return Ok(selection);
            }
            Err(BindError::Fatal(err)) => return Err(err),
            Err(BindError::Failed(failure)) => {
                trace!(kind, handler = %handler.label, reason = %failure, "handler abandoned");
                attempted.push(Attempt {
                    handler: handler.label.clone(),
                    reason: failure.to_string(),
                });
            }
        }
    }

    Err(ScenarioError::NoMatch {
        kind: kind.to_string(),
        name: event.head().unwrap_or_default().to_string(),
        event: event.to_string(),
        attempted,
    })
}

//=====================================================
// Section 3.0 - Entry points
//=====================================================

/// Resolve `event` against `fetchers`. A bare token that nothing claims is
/// returned as a string literal.
pub fn get_fetcher_value(
    kind: &str,
    fetchers: &[Fetcher],
    world: &World,
    event: &Event,
) -> ScenarioResult<Value> {
    match select(kind, fetchers, world, event) {
        Ok(selection) => (selection.effect)(world, &selection.args),
        Err(ScenarioError::NoMatch { .. }) if event.is_token() => {
            trace!(kind, event = %event, "unclaimed token resolved as literal");
            Ok(Value::String(event.head().unwrap_or_default().to_string()))
        }
        Err(err) => Err(err),
    }
}

/// Run the command matching `event` on behalf of `from`, producing the next
/// world.
pub fn process_command_event(
    kind: &str,
    commands: &[Command],
    world: World,
    event: &Event,
    from: &Address,
) -> ScenarioResult<World> {
    let selection = select(kind, commands, &world, event)?;
    (selection.effect)(world, from, &selection.args)
}


//=====================================================
// End of file
//=====================================================
