// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Integration tests for spikecore-npu-plasticity
//!
//! These tests build host regions, initialise engines from them and drive
//! spike trains through every timing and weight variant.

use spikecore_npu_neural::{ControlFields, ControlWordLayout, NeuronId};
use spikecore_npu_plasticity::random::DEFAULT_SEED;
use spikecore_npu_plasticity::timing::WINDOW_TABLE_LEN;
use spikecore_npu_plasticity::*;

fn weight_region(min: i32, max: i32) -> WeightRegion {
    WeightRegion {
        min_weight: min,
        max_weight: max,
        a2_plus: 200,
        a2_minus: 150,
        weight_shift: 12,
        threshold: (min + max) / 2,
    }
}

fn push_weights(writer: &mut RegionWriter, regions: &[WeightRegion]) {
    for region in regions {
        for word in region.to_words() {
            writer.push_u32(word);
        }
    }
}

fn pair_region(regions: &[WeightRegion]) -> Vec<u32> {
    let mut writer = RegionWriter::new();
    writer
        .push_exp_decay_table(20.0, 512, 0)
        .push_exp_decay_table(20.0, 512, 0);
    push_weights(&mut writer, regions);
    writer.into_words()
}

fn recurrent_region(regions: &[WeightRegion], pre_window: u16, post_window: u16) -> Vec<u32> {
    let mut writer = RegionWriter::new();
    writer
        .push_i32(-2)
        .push_i32(2)
        .push_packed_u16(&vec![pre_window; WINDOW_TABLE_LEN])
        .push_packed_u16(&vec![post_window; WINDOW_TABLE_LEN])
        .push_seed(DEFAULT_SEED);
    push_weights(&mut writer, regions);
    writer.into_words()
}

fn control(index: u32, synapse_type: u32) -> u32 {
    ControlWordLayout::DEFAULT
        .pack(ControlFields {
            index,
            synapse_type,
            delay: 0,
        })
        .unwrap()
}

fn params(timing: TimingKind, weight: WeightKind, n_synapse_types: u32) -> EngineParams {
    EngineParams {
        timing,
        weight,
        n_neurons: 16,
        n_synapse_types,
        ..EngineParams::default()
    }
}

/// Pre at t, post at t + 2, repeated: causal pairing
fn run_causal_train(engine: &mut PlasticityEngine, row: &mut [u32], neuron: u32, repeats: u32) {
    for k in 0..repeats {
        let t = 10 + k * 40;
        engine.begin_tick(t);
        engine.process_presynaptic_event(t, row).unwrap();
        engine.process_postsynaptic_event(t + 2, NeuronId(neuron)).unwrap();
    }
    let end = 10 + repeats * 40;
    engine.begin_tick(end);
    engine.process_presynaptic_event(end, row).unwrap();
}

/// Post at t, pre at t + 2, repeated: anti-causal pairing
fn run_anti_causal_train(engine: &mut PlasticityEngine, row: &mut [u32], neuron: u32, repeats: u32) {
    for k in 0..repeats {
        let t = 10 + k * 40;
        engine.begin_tick(t);
        engine.process_postsynaptic_event(t, NeuronId(neuron)).unwrap();
        engine.process_presynaptic_event(t + 2, row).unwrap();
    }
}

#[test]
fn test_pair_rule_causal_potentiates_anti_causal_depresses() {
    for weight in [WeightKind::Multiplicative, WeightKind::Additive] {
        let region = pair_region(&[weight_region(0, 4000)]);
        let (mut engine, _) =
            PlasticityEngine::initialise(RegionReader::new(&region), &params(TimingKind::Pair, weight, 1))
                .unwrap();

        let mut ltp = build_row(TraceEvent::default(), &[(2000, control(1, 0))]);
        run_causal_train(&mut engine, &mut ltp, 1, 10);
        assert!(ltp[3] as u16 > 2000, "{:?}: {}", weight, ltp[3] as u16);

        let mut ltd = build_row(TraceEvent::default(), &[(2000, control(2, 0))]);
        run_anti_causal_train(&mut engine, &mut ltd, 2, 10);
        assert!((ltd[3] as u16) < 2000, "{:?}: {}", weight, ltd[3] as u16);
    }
}

#[test]
fn test_nearest_pair_bounded_by_single_pairing() {
    let regions = [weight_region(0, 60_000)];
    let region = pair_region(&regions);
    let mut all = PlasticityEngine::initialise(
        RegionReader::new(&region),
        &params(TimingKind::Pair, WeightKind::Additive, 1),
    )
    .unwrap()
    .0;
    let mut nearest = PlasticityEngine::initialise(
        RegionReader::new(&region),
        &params(TimingKind::NearestPair, WeightKind::Additive, 1),
    )
    .unwrap()
    .0;

    // Burst of pre spikes, then one post
    let mut row_all = build_row(TraceEvent::default(), &[(1000, control(0, 0))]);
    let mut row_nearest = row_all.clone();
    for t in [10, 11, 12, 13] {
        all.process_presynaptic_event(t, &mut row_all).unwrap();
        nearest.process_presynaptic_event(t, &mut row_nearest).unwrap();
    }
    all.process_postsynaptic_event(14, NeuronId(0)).unwrap();
    nearest.process_postsynaptic_event(14, NeuronId(0)).unwrap();
    all.process_presynaptic_event(400, &mut row_all).unwrap();
    nearest.process_presynaptic_event(400, &mut row_nearest).unwrap();

    assert!(row_all[3] as u16 > row_nearest[3] as u16);
    assert!(row_nearest[3] as u16 > 1000);
}

#[test]
fn test_step_weight_rule_snaps() {
    let region = pair_region(&[weight_region(100, 3000)]);
    let (mut engine, _) = PlasticityEngine::initialise(
        RegionReader::new(&region),
        &params(TimingKind::Pair, WeightKind::Step, 1),
    )
    .unwrap();

    let mut row = build_row(TraceEvent::default(), &[(1600, control(4, 0)), (1400, control(5, 0))]);
    engine.process_presynaptic_event(1, &mut row).unwrap();
    for w in [row[3] as u16, row[4] as u16] {
        assert!(w == 100 || w == 3000, "w = {}", w);
    }
    // No plasticity yet: each side of the threshold
    assert_eq!(row[3] as u16, 3000);
    assert_eq!(row[4] as u16, 100);
}

#[test]
fn test_synapse_types_use_their_own_region() {
    let regions = [weight_region(0, 5000), weight_region(0, 1200)];
    let region = pair_region(&regions);
    let (mut engine, _) = PlasticityEngine::initialise(
        RegionReader::new(&region),
        &params(TimingKind::Pair, WeightKind::Additive, 2),
    )
    .unwrap();

    let mut row = build_row(TraceEvent::default(), &[(1000, control(3, 0)), (1000, control(3, 1))]);
    run_causal_train(&mut engine, &mut row, 3, 30);

    assert!(row[3] as u16 > 1200);
    assert_eq!(row[4] as u16, 1200);
}

#[test]
fn test_dual_fsm_end_to_end() {
    let region = recurrent_region(&[weight_region(0, 4000)], 30, 30);
    let (mut engine, _) = PlasticityEngine::initialise(
        RegionReader::new(&region),
        &params(TimingKind::DualFsm, WeightKind::Additive, 1),
    )
    .unwrap();
    assert_eq!(engine.plastic_layout(), PlasticWordLayout::WeightAccumulator);

    let mut row = build_row(TraceEvent::default(), &[(2000, control(6, 0))]);
    run_causal_train(&mut engine, &mut row, 6, 6);

    let state = engine.plastic_layout().unpack(row[3]);
    // Every post lands inside the pre window: each pair of steps potentiates once
    assert!(state.weight > 2000, "weight = {}", state.weight);
    assert!(state.accumulator >= 0 && state.accumulator < 2);
}

#[test]
fn test_pre_stochastic_end_to_end() {
    let region = recurrent_region(&[weight_region(0, 4000)], 5, 5);
    let (mut engine, _) = PlasticityEngine::initialise(
        RegionReader::new(&region),
        &params(TimingKind::PreStochastic, WeightKind::Additive, 1),
    )
    .unwrap();
    assert_eq!(engine.plastic_layout(), PlasticWordLayout::WeightAccumulatorWindow);

    let mut row = build_row(TraceEvent::default(), &[(2000, control(7, 0))]);
    run_causal_train(&mut engine, &mut row, 7, 6);

    let state = engine.plastic_layout().unpack(row[3]);
    assert!(state.weight > 2000, "weight = {}", state.weight);
    assert_eq!(state.window, 5);
}

#[test]
fn test_region_sections_chain() {
    // Two sub-modules read back to back from one region
    let first = pair_region(&[weight_region(0, 1000)]);
    let second = pair_region(&[weight_region(0, 2000)]);
    let mut region = first.clone();
    region.extend_from_slice(&second);

    let p = params(TimingKind::Pair, WeightKind::Additive, 1);
    let (a, rest) = PlasticityEngine::initialise(RegionReader::new(&region), &p).unwrap();
    assert_eq!(rest.position(), first.len());
    let (b, rest) = PlasticityEngine::initialise(rest, &p).unwrap();
    assert_eq!(rest.remaining(), 0);

    assert_eq!(a.weight().region(0).unwrap().max_weight, 1000);
    assert_eq!(b.weight().region(0).unwrap().max_weight, 2000);
}

#[test]
fn test_stats_after_mixed_traffic() {
    let region = pair_region(&[weight_region(0, 4000)]);
    let mut p = params(TimingKind::Pair, WeightKind::Multiplicative, 1);
    p.synapse_updates_per_tick = 3;
    let (mut engine, _) = PlasticityEngine::initialise(RegionReader::new(&region), &p).unwrap();

    let mut small = build_row(TraceEvent::default(), &[(100, control(0, 0)), (100, control(1, 0))]);
    let mut other = small.clone();

    engine.begin_tick(1);
    engine.process_postsynaptic_event(1, NeuronId(0)).unwrap();
    assert!(matches!(
        engine.process_presynaptic_event(1, &mut small).unwrap(),
        RowOutcome::Processed { synapses: 2 }
    ));
    assert!(matches!(
        engine.process_presynaptic_event(1, &mut other).unwrap(),
        RowOutcome::Dropped { synapses: 2 }
    ));

    let stats = engine.stats();
    assert_eq!(stats.pre_events, 1);
    assert_eq!(stats.post_events, 1);
    assert_eq!(stats.synapses_updated, 2);
    assert_eq!(stats.rows_dropped, 1);
    assert_eq!(stats.bound_violations, 0);
}
