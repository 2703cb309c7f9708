use std::cmp::Reverse;
use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::search::{
    Bound, Cost, PruneRatio, SearchConfig, SearchError, SearchProblem, SeenPolicy, Successor,
    search,
};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 19, tags = ["search", "optimisation"])]
pub struct Solver;

/// Candidates whose guaranteed geodes fall below this fraction of the best
/// guarantee at the same minute are dropped.
pub const DEFAULT_PRUNE_RATIO: PruneRatio = PruneRatio::HALF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Ore,
    Clay,
    Obsidian,
    Geode,
}

impl Resource {
    const ALL: [Resource; 4] = [
        Resource::Ore,
        Resource::Clay,
        Resource::Obsidian,
        Resource::Geode,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Resource {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ore" => Ok(Resource::Ore),
            "clay" => Ok(Resource::Clay),
            "obsidian" => Ok(Resource::Obsidian),
            "geode" => Ok(Resource::Geode),
            _ => Err(ParseError::UnrecognizedVariant {
                kind: "resource",
                token: s.to_string(),
            }),
        }
    }
}

type Amounts = [u32; 4];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    id: u32,
    // costs[robot][resource]
    costs: [Amounts; 4],
    // Building more robots of a kind than this per minute is never useful
    max_spend: Amounts,
}

impl Blueprint {
    fn new(id: u32, costs: [Amounts; 4]) -> Self {
        let mut max_spend = [0; 4];
        for cost in &costs {
            for (max, &amount) in max_spend.iter_mut().zip(cost) {
                *max = (*max).max(amount);
            }
        }
        max_spend[Resource::Geode.index()] = u32::MAX;
        Self {
            id,
            costs,
            max_spend,
        }
    }

    fn cost(&self, robot: Resource) -> &Amounts {
        &self.costs[robot.index()]
    }
}

fn parse_blueprint(text: &str) -> anyhow::Result<Blueprint> {
    let (id, rules) = text
        .split_once(':')
        .ok_or_else(|| anyhow!("missing ':' after the blueprint id"))?;
    let id = id.trim().parse().context("blueprint id")?;

    let mut costs: [Option<Amounts>; 4] = [None; 4];
    for rule in rules.split('.').map(str::trim).filter(|r| !r.is_empty()) {
        // Each <robot> robot costs <n> <resource> [and <n> <resource>]*
        let tokens: Vec<&str> = rule.split_whitespace().collect();
        let (robot, amounts) = match tokens.as_slice() {
            ["Each", robot, "robot", "costs", amounts @ ..] => (robot.parse::<Resource>()?, amounts),
            _ => bail!("unexpected rule {rule:?}"),
        };

        let mut cost = [0; 4];
        for (i, chunk) in amounts.split(|&t| t == "and").enumerate() {
            let [amount, resource] = chunk else {
                bail!("cost #{} of the {robot:?} robot is not '<amount> <resource>'", i + 1);
            };
            let resource: Resource = resource.parse()?;
            cost[resource.index()] = amount
                .parse()
                .with_context(|| format!("amount {amount:?}"))?;
        }
        if costs[robot.index()].replace(cost).is_some() {
            bail!("{robot:?} robot priced twice");
        }
    }

    let mut complete = [[0; 4]; 4];
    for robot in Resource::ALL {
        complete[robot.index()] =
            costs[robot.index()].ok_or_else(|| anyhow!("no price for the {robot:?} robot"))?;
    }
    Ok(Blueprint::new(id, complete))
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Blueprint>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let blueprints = input
            .split("Blueprint")
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .enumerate()
            .map(|(i, text)| {
                parse_blueprint(text).map_err(|e| match e.downcast::<ParseError>() {
                    Ok(parse_error) => parse_error,
                    Err(e) => ParseError::InvalidFormat(format!("(blueprint #{}) {e:#}", i + 1)),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if blueprints.is_empty() {
            return Err(ParseError::MissingData("no blueprints".to_string()));
        }
        Ok(blueprints)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut total = 0;
        for blueprint in shared.iter() {
            total += blueprint.id * solve_blueprint(blueprint, 24)?;
        }
        Ok(total.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut product: u64 = 1;
        for blueprint in shared.iter().take(3) {
            product *= u64::from(solve_blueprint(blueprint, 32)?);
        }
        Ok(product.to_string())
    }
}

fn solve_blueprint(blueprint: &Blueprint, minutes: u32) -> Result<u32, SolveError> {
    max_geodes(blueprint, minutes, Some(DEFAULT_PRUNE_RATIO))
        .map_err(|e| SolveError::SolveFailed(e.into()))?
        .ok_or_else(|| {
            SolveError::NoSolution(format!("blueprint {} pruned to nothing", blueprint.id))
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Factory {
    elapsed: u32,
    stock: Amounts,
    robots: Amounts,
}

impl Factory {
    fn geodes(&self) -> u32 {
        self.stock[Resource::Geode.index()]
    }

    /// Idle for `minutes`, collecting with every robot.
    fn collect(&self, minutes: u32) -> Amounts {
        std::array::from_fn(|i| self.stock[i] + self.robots[i] * minutes)
    }

    /// Minutes of collecting before `cost` is affordable, if it ever is.
    fn wait_for(&self, cost: &Amounts) -> Option<u32> {
        let mut wait = 0;
        for i in 0..4 {
            if self.stock[i] >= cost[i] {
                continue;
            }
            if self.robots[i] == 0 {
                return None;
            }
            wait = wait.max((cost[i] - self.stock[i]).div_ceil(self.robots[i]));
        }
        Some(wait)
    }
}

/// Running one blueprint's factory for `horizon` minutes.
///
/// Each step jumps straight to the next robot build, or idles until the end.
struct Production<'b> {
    blueprint: &'b Blueprint,
    horizon: u32,
}

impl Production<'_> {
    fn minutes_left(&self, factory: &Factory) -> u32 {
        self.horizon - factory.elapsed
    }

    /// Geodes guaranteed at the horizon by the robots already running
    fn projected(&self, factory: &Factory) -> u32 {
        factory.geodes() + factory.robots[Resource::Geode.index()] * self.minutes_left(factory)
    }
}

impl SearchProblem for Production<'_> {
    type State = Factory;
    type Key = Factory;
    /// Minute first, then the most promising factory
    type Priority = (u32, Reverse<u32>);

    fn start_states(&self) -> Vec<Factory> {
        let mut robots = [0; 4];
        robots[Resource::Ore.index()] = 1;
        vec![Factory {
            elapsed: 0,
            stock: [0; 4],
            robots,
        }]
    }

    fn successors(&self, factory: &Factory) -> Vec<Successor<Factory>> {
        let left = self.minutes_left(factory);
        if left == 0 {
            return Vec::new();
        }

        let mut next = Vec::with_capacity(5);
        for robot in Resource::ALL.into_iter().rev() {
            if factory.robots[robot.index()] >= self.blueprint.max_spend[robot.index()] {
                continue;
            }
            let cost = self.blueprint.cost(robot);
            let Some(wait) = factory.wait_for(cost) else {
                continue;
            };
            // A robot finished on the last minute never collects
            let minutes = wait + 1;
            if minutes >= left {
                continue;
            }

            let mut stock = factory.collect(minutes);
            for (have, spent) in stock.iter_mut().zip(cost) {
                *have -= spent;
            }
            let mut robots = factory.robots;
            robots[robot.index()] += 1;
            next.push(Successor::new(
                Factory {
                    elapsed: factory.elapsed + minutes,
                    stock,
                    robots,
                },
                minutes,
            ));
        }

        next.push(Successor::new(
            Factory {
                elapsed: self.horizon,
                stock: factory.collect(left),
                robots: factory.robots,
            },
            left,
        ));
        next
    }

    fn priority(&self, factory: &Factory, _cost: Cost) -> (u32, Reverse<u32>) {
        (factory.elapsed, Reverse(self.projected(factory)))
    }

    fn is_goal(&self, factory: &Factory) -> bool {
        factory.elapsed == self.horizon
    }

    fn key(&self, factory: &Factory) -> Factory {
        factory.clone()
    }

    /// Geodes the factory is sure to hold at the horizon
    fn bound(&self, factory: &Factory, _cost: Cost) -> Option<Bound> {
        Some(Bound {
            tier: factory.elapsed,
            value: u64::from(self.projected(factory)),
        })
    }
}

/// Most geodes `blueprint` can open within `horizon` minutes.
///
/// Every factory is at the horizon when popped and the frontier orders
/// them by geodes, so the first goal is the best survivor. With `prune`
/// set that survivor may fall short of the true optimum; `None` is exact.
pub fn max_geodes(
    blueprint: &Blueprint,
    horizon: u32,
    prune: Option<PruneRatio>,
) -> Result<Option<u32>, SearchError> {
    let production = Production { blueprint, horizon };
    let mut config = SearchConfig::default().with_policy(SeenPolicy::OnSchedule);
    config.prune = prune;

    let outcome = search(&production, config)?;
    log::debug!(
        "blueprint {} over {horizon} minutes: {:?}",
        blueprint.id,
        outcome.stats()
    );
    Ok(outcome.found().map(|solution| solution.state().geodes()))
}
