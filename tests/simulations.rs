use std::collections::{BTreeMap, VecDeque};

use precinct_sim::config::Configuration;
use precinct_sim::input_modeling::{RandomSource, SeededRandom};
use precinct_sim::models::{read_precincts, Precinct, Voter, VoterPopulationGenerator};
use precinct_sim::output_analysis::{WaitHistogram, WaitStatistics};
use precinct_sim::simulator::{BatchSimulation, PrecinctSimulation, StationAllocation};
use precinct_sim::utils::errors::SimulationError;

fn epsilon() -> f64 {
    1.0e-9
}

/// A random source replaying fixed exponential gaps, always picking the
/// first service-time sample.
#[derive(Debug)]
struct ScriptedRandom {
    gaps: VecDeque<u64>,
}

impl ScriptedRandom {
    fn new(gaps: &[u64]) -> Self {
        Self {
            gaps: gaps.iter().copied().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform_int(&mut self, lower: i64, _upper: i64) -> Result<i64, SimulationError> {
        Ok(lower)
    }

    fn uniform_double(&mut self, lower: f64, _upper: f64) -> Result<f64, SimulationError> {
        Ok(lower)
    }

    fn exponential_int(&mut self, _lambda: f64) -> Result<u64, SimulationError> {
        Ok(self.gaps.pop_front().unwrap_or(1))
    }

    fn normal(&mut self, mean: f64, _dev: f64) -> Result<f64, SimulationError> {
        Ok(mean)
    }
}

fn one_hour_configuration() -> Configuration {
    Configuration {
        seed: 42,
        election_day_length_hours: 1,
        time_to_vote_mean_seconds: 60,
        min_expected_to_simulate: 0,
        max_expected_to_simulate: 1000,
        wait_time_minutes_that_is_too_long: 100,
        number_of_iterations: 1,
        arrival_zero: 0.0,
        arrival_fractions: vec![100.0],
        service_times: vec![60],
    }
}

fn election_day_configuration() -> Configuration {
    Configuration {
        seed: 2016,
        election_day_length_hours: 13,
        time_to_vote_mean_seconds: 330,
        min_expected_to_simulate: 100,
        max_expected_to_simulate: 700,
        wait_time_minutes_that_is_too_long: 30,
        number_of_iterations: 3,
        arrival_zero: 8.0,
        arrival_fractions: vec![
            9.0, 8.0, 7.0, 6.0, 6.0, 6.0, 6.0, 7.0, 7.0, 8.0, 9.0, 7.0, 6.0,
        ],
        service_times: vec![180, 240, 270, 300, 330, 360, 420, 480, 600],
    }
}

fn precinct(number: i64, expected_voters: i64) -> Precinct {
    Precinct {
        number,
        name: format!["Ward-{}", number],
        turnout: 55.0,
        num_voters: expected_voters * 2,
        expected_voters,
        expected_per_hour: expected_voters / 13,
        stations: 3,
        minority: 20.0,
        stations_to_histo: vec![2, 3, 4].into_iter().collect(),
    }
}

fn assert_lifecycle_invariants(population: usize, voters: &[Voter]) {
    assert_eq!(voters.len(), population);
    voters.iter().for_each(|voter| {
        let start = voter.time_start_voting().unwrap();
        let done = voter.time_done_voting().unwrap();
        assert!(start >= voter.time_arrival());
        assert_eq!(voter.time_waiting().unwrap(), start - voter.time_arrival());
        assert_eq!(done, start + voter.time_vote_duration());
        assert!(done >= voter.time_arrival());
    });
}

fn assert_no_station_overlap(voters: &[Voter]) {
    let mut by_station: BTreeMap<usize, Vec<(u64, u64)>> = BTreeMap::new();
    voters.iter().for_each(|voter| {
        by_station
            .entry(voter.station().unwrap())
            .or_default()
            .push((
                voter.time_start_voting().unwrap(),
                voter.time_done_voting().unwrap(),
            ));
    });
    by_station.values_mut().for_each(|intervals| {
        intervals.sort_unstable();
        assert!(intervals.windows(2).all(|pair| pair[1].0 >= pair[0].1));
    });
}

#[test]
fn generated_day_satisfies_voter_invariants() -> Result<(), SimulationError> {
    let configuration = election_day_configuration();
    let generator = VoterPopulationGenerator::new(&configuration)?;
    let mut random = SeededRandom::new(configuration.seed);
    for stations_count in 1..=6 {
        let voters = generator.generate(600, &mut random)?;
        let population = voters.len();
        let outcome = StationAllocation::new(voters, stations_count)?.run()?;
        assert_lifecycle_invariants(population, &outcome.voters);
        assert_no_station_overlap(&outcome.voters);
        assert!(outcome
            .voters
            .iter()
            .all(|voter| voter.station().unwrap() < stations_count));
        let completions: Vec<u64> = outcome
            .voters
            .iter()
            .map(|voter| voter.time_done_voting().unwrap())
            .collect();
        assert!(completions.windows(2).all(|pair| pair[0] <= pair[1]));
    }
    Ok(())
}

#[test]
fn more_stations_never_increase_long_waits() -> Result<(), SimulationError> {
    let arrivals_and_durations: [(u64, u64); 12] = [
        (0, 400),
        (0, 300),
        (0, 500),
        (10, 200),
        (20, 600),
        (30, 100),
        (30, 300),
        (60, 240),
        (90, 360),
        (120, 180),
        (150, 420),
        (200, 90),
    ];
    let voters: Vec<Voter> = arrivals_and_durations
        .iter()
        .enumerate()
        .map(|(sequence, (arrival, duration))| Voter::new(sequence, *arrival, *duration))
        .collect();
    let mut previous_too_long = usize::MAX;
    let mut previous_total_wait = u64::MAX;
    for stations_count in 1..=5 {
        let outcome = StationAllocation::new(voters.clone(), stations_count)?.run()?;
        let mut histogram = WaitHistogram::new();
        let statistics = WaitStatistics::compute(&outcome.voters, 12, 1, &mut histogram);
        let total_wait: u64 = outcome
            .voters
            .iter()
            .filter_map(Voter::time_waiting)
            .sum();
        assert!(statistics.too_long.over <= previous_too_long);
        assert!(total_wait <= previous_total_wait);
        previous_too_long = statistics.too_long.over;
        previous_total_wait = total_wait;
    }
    Ok(())
}

#[test]
fn four_voters_on_one_station() -> Result<(), SimulationError> {
    let configuration = one_hour_configuration();
    let generator = VoterPopulationGenerator::new(&configuration)?;
    let mut random = ScriptedRandom::new(&[10, 10, 10, 10, 10]);
    let voters = generator.generate(4, &mut random)?;
    // Four expected voters, plus the even-hour rounding voter
    assert_eq!(voters.len(), 5);
    let arrivals: Vec<u64> = voters.iter().map(Voter::time_arrival).collect();
    assert_eq!(arrivals, vec![10, 20, 30, 40, 50]);

    let outcome = StationAllocation::new(voters, 1)?.run()?;
    assert_lifecycle_invariants(5, &outcome.voters);
    assert!(outcome.end_time >= 240);
    assert_eq!(outcome.end_time, 311);
    let waits: Vec<u64> = outcome
        .voters
        .iter()
        .filter_map(Voter::time_waiting)
        .collect();
    assert_eq!(waits, vec![0, 50, 100, 150, 200]);

    let mut histogram = WaitHistogram::new();
    let statistics = WaitStatistics::compute(
        &outcome.voters,
        4,
        configuration.wait_time_minutes_that_is_too_long,
        &mut histogram,
    );
    assert_eq!(statistics.too_long.over, 0);
    // Divided by the four expected voters, not the five observed
    assert!((statistics.wait_mean_seconds.unwrap() - 125.0).abs() < epsilon());
    assert!(statistics.wait_dev_seconds.unwrap().is_finite());
    Ok(())
}

#[test]
fn seeded_one_hour_scenario_has_no_long_waits() -> Result<(), SimulationError> {
    let configuration = one_hour_configuration();
    let simulation = PrecinctSimulation::new(&configuration)?;
    let mut random = SeededRandom::new(configuration.seed);
    let mut sink: Vec<String> = Vec::new();
    let outcome = simulation.run(&precinct(1, 4), &mut random, &mut sink)?;
    assert_eq!(outcome.min_stations, 1);
    assert_eq!(outcome.results.len(), 1);
    assert!(outcome.is_satisfied());
    let trial = &outcome.results[0].trials[0];
    assert_eq!(trial.voters_done, 5);
    assert!(trial.wait_mean_seconds.unwrap().is_finite());
    Ok(())
}

#[test]
fn empty_precinct_reports_without_faults() -> Result<(), SimulationError> {
    let configuration = one_hour_configuration();
    let simulation = PrecinctSimulation::new(&configuration)?;
    let mut random = SeededRandom::new(configuration.seed);
    let mut sink: Vec<String> = Vec::new();
    let outcome = simulation.run(&precinct(9, 0), &mut random, &mut sink)?;
    let trial = &outcome.results[0].trials[0];
    assert!(!trial.has_data());
    assert_eq!(trial.voters_done, 0);
    assert!(sink.iter().all(|line| !line.contains("NaN")));
    assert!(sink.iter().any(|line| line.ends_with("no data")));
    Ok(())
}

#[test]
fn histogram_of_uniform_waits_has_one_bucket() -> Result<(), SimulationError> {
    // A hundred voters block every station for five minutes; a hundred more
    // arriving with them each wait exactly that long.
    let voters: Vec<Voter> = (0..200)
        .map(|sequence| {
            let duration = if sequence < 100 { 300 } else { 60 };
            Voter::new(sequence, 0, duration)
        })
        .collect();
    let outcome = StationAllocation::new(voters, 100)?.run()?;
    let waiting: Vec<Voter> = outcome
        .voters
        .into_iter()
        .filter(|voter| voter.sequence() >= 100)
        .collect();
    assert!(waiting.iter().all(|voter| voter.time_waiting() == Some(300)));

    let iterations = 2;
    let mut histogram = WaitHistogram::new();
    for _ in 0..iterations {
        WaitStatistics::compute(&waiting, 100, 30, &mut histogram);
    }
    assert_eq!(histogram.lowest(), Some(5));
    assert_eq!(histogram.highest(), Some(5));
    assert_eq!(histogram.count(5), 100 * iterations as u64);
    let rows = histogram.rows(iterations);
    assert_eq!(rows.len(), 1);
    assert!((rows[0].average_count - 100.0).abs() < epsilon());
    assert_eq!(histogram.voters_per_star(iterations), 2);
    assert_eq!(rows[0].stars, 50);
    Ok(())
}

const PRECINCT_RECORDS: &str = "\
    30 Ward-Thirty 50.0 900 450 35 3 20.0 2 3 4\n\
    10 Ward-Ten 50.0 400 100 8 2 20.0 1 2 3\n\
    20 Ward-Twenty 50.0 1400 700 54 4 20.0 3 4 5\n\
    40 Ward-Forty 50.0 2000 701 54 4 20.0 3 4 5\n\
    5 Ward-Five 50.0 300 150 12 1 20.0 1 2 3\n";

#[test]
fn batch_respects_bounds_and_order() -> Result<(), SimulationError> {
    let mut configuration = election_day_configuration();
    configuration.number_of_iterations = 1;
    let precincts = read_precincts(PRECINCT_RECORDS)?;
    let batch = BatchSimulation::post(configuration.clone(), precincts)?;
    let mut random = SeededRandom::new(configuration.seed);
    let mut sink: Vec<String> = Vec::new();
    let outcome = batch.run(&mut random, &mut sink)?;
    // 100 is excluded by the exclusive lower bound, 701 by the upper bound
    let simulated: Vec<i64> = outcome
        .precincts
        .iter()
        .map(|precinct| precinct.precinct_number)
        .collect();
    assert_eq!(simulated, vec![5, 20, 30]);
    assert_eq!(outcome.precincts_simulated, 3);
    assert_eq!(
        sink.last().map(String::as_str),
        Some("SIM: PRECINCT COUNT THIS BATCH    3")
    );
    outcome.precincts.iter().for_each(|precinct| {
        assert!(precinct.results.len() <= precinct.max_stations - precinct.min_stations + 1);
        let satisfied_counts = precinct
            .results
            .iter()
            .filter(|result| result.is_satisfied())
            .count();
        // The sweep stops at the first satisfied station count
        assert!(satisfied_counts <= 1);
        if satisfied_counts == 1 {
            assert!(precinct.is_satisfied());
        }
    });
    Ok(())
}

#[test]
fn batch_replays_identically_for_a_seed() -> Result<(), SimulationError> {
    let mut configuration = election_day_configuration();
    configuration.number_of_iterations = 2;
    let precincts = read_precincts(PRECINCT_RECORDS)?;
    let batch = BatchSimulation::post(configuration, precincts)?;
    let mut first: Vec<String> = Vec::new();
    let mut second: Vec<String> = Vec::new();
    batch.run(&mut SeededRandom::new(77), &mut first)?;
    batch.run(&mut SeededRandom::new(77), &mut second)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn invalid_configuration_fails_before_simulating() {
    let mut configuration = one_hour_configuration();
    configuration.arrival_fractions = vec![50.0, 50.0];
    let precincts = read_precincts(PRECINCT_RECORDS).unwrap();
    assert!(matches!(
        BatchSimulation::post(configuration, precincts),
        Err(SimulationError::InvalidConfiguration(_))
    ));
}
