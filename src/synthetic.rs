// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Deterministic synthetic spike trains for exercising a booted core
//!
//! Every pre-synaptic source owns one row and fires with clipped-exponential
//! inter-spike intervals. Post-synaptic neurons fire at random with a base
//! probability, and additionally a fixed lag after a row reaches them. All
//! randomness comes from `MarsKiss64` streams seeded from the config, so two
//! runs with the same inputs produce identical weights.

use spikecore_config::CoreConfig;
use spikecore_npu_neural::{Accum, ControlFields, NeuronId, Tick};
use spikecore_npu_plasticity::{
    build_row, ExponentialClipped, MarsKiss64, PlasticWordLayout, PlasticityStats, RowOutcome,
    SynapseState, TraceEvent,
};
use spikecore_npu_runtime::{CoreCallbacks, CoreRuntime};
use tracing::{debug, info};

use crate::host::{engine_params, HostError};

/// Shape of a synthetic run
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeTrainParams {
    pub ticks: u32,
    pub sources: u32,
    pub synapses_per_row: u32,
    /// Mean pre-synaptic inter-spike interval, in ticks
    pub mean_isi: f64,
    /// Per-tick firing probability of each post-synaptic neuron
    pub post_rate: f64,
    /// Probability that a target fires `lag` ticks after a row reaches it
    pub coupling: f64,
    pub lag: u32,
}

impl Default for SpikeTrainParams {
    fn default() -> Self {
        Self {
            ticks: 1000,
            sources: 16,
            synapses_per_row: 32,
            mean_isi: 20.0,
            post_rate: 0.01,
            coupling: 0.3,
            lag: 3,
        }
    }
}

/// Outcome of a synthetic run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainReport {
    pub stats: PlasticityStats,
    pub rows_delivered: u64,
    pub rows_dropped: u64,
    pub rows_rejected: u64,
    pub post_spikes: u64,
    /// Final rows, one per source
    pub rows: Vec<Vec<u32>>,
    pub plastic_layout: PlasticWordLayout,
}

impl TrainReport {
    /// Final weight of every synapse, row by row
    pub fn weights(&self) -> Vec<Vec<u16>> {
        self.rows
            .iter()
            .map(|row| {
                let n = row[2] as usize;
                row[3..3 + n]
                    .iter()
                    .map(|&word| self.plastic_layout.unpack(word).weight)
                    .collect()
            })
            .collect()
    }
}

struct Source {
    row: Vec<u32>,
    next_spike: Tick,
}

fn next_interval(isi: &ExponentialClipped, rng: &mut MarsKiss64) -> Result<Tick, HostError> {
    Ok(isi.generate(rng)?.to_int().max(1) as Tick)
}

fn probability_threshold(p: f64) -> u32 {
    (p.clamp(0.0, 1.0) * u32::MAX as f64) as u32
}

/// Drive `core` with a synthetic train built from `config`
pub fn run_spike_train(
    core: &CoreRuntime,
    config: &CoreConfig,
    params: &SpikeTrainParams,
) -> Result<TrainReport, HostError> {
    let engine_params = engine_params(config)?;
    let layout = engine_params.control_layout;
    let n_neurons = engine_params.n_neurons;
    let n_types = engine_params.n_synapse_types.max(1);
    let plastic_layout = core.with_engine(|engine| engine.plastic_layout())?;

    let seed = config.plasticity.seed;
    let mut isi_rng = MarsKiss64::new(seed);
    let mut post_rng = MarsKiss64::new([seed[3], seed[2], seed[1] ^ 0x5bd1_e995, seed[0]]);

    let isi = ExponentialClipped::new(
        Accum::ONE,
        Accum::from_f64(params.mean_isi * 8.0),
        Accum::from_f64(params.mean_isi),
    );

    let mut sources = Vec::with_capacity(params.sources as usize);
    for s in 0..params.sources {
        let mut synapses = Vec::with_capacity(params.synapses_per_row as usize);
        for j in 0..params.synapses_per_row {
            let synapse_type = j % n_types;
            let weight = &config.weights[synapse_type as usize];
            let control = layout.pack(ControlFields {
                index: (s * 7 + j * 13) % n_neurons,
                synapse_type,
                delay: j % layout.max_delay().saturating_add(1),
            })?;
            let initial = ((weight.min_weight + weight.max_weight) / 2) as u16;
            synapses.push((plastic_layout.pack(SynapseState::with_weight(initial)), control));
        }
        sources.push(Source {
            row: build_row(TraceEvent::default(), &synapses),
            next_spike: next_interval(&isi, &mut isi_rng)?,
        });
    }

    let post_threshold = probability_threshold(params.post_rate);
    let coupling_threshold = probability_threshold(params.coupling);
    let mut pending: Vec<(Tick, u32)> = Vec::new();
    let mut fired = vec![false; n_neurons as usize];
    let mut report = TrainReport {
        stats: PlasticityStats::default(),
        rows_delivered: 0,
        rows_dropped: 0,
        rows_rejected: 0,
        post_spikes: 0,
        rows: Vec::new(),
        plastic_layout,
    };

    info!(
        "Synthetic train: {} ticks, {} sources x {} synapses, mean ISI {}",
        params.ticks, params.sources, params.synapses_per_row, params.mean_isi
    );

    for tick in 1..=params.ticks {
        core.on_timer_tick(tick)?;

        // Post-synaptic spikes: coupled responses first, then background firing
        fired.iter_mut().for_each(|f| *f = false);
        pending.retain(|&(due, neuron)| {
            if due == tick {
                fired[neuron as usize] = true;
                false
            } else {
                true
            }
        });
        for (neuron, did_fire) in fired.iter_mut().enumerate() {
            if post_rng.next_u32() < post_threshold {
                *did_fire = true;
            }
            if *did_fire {
                core.on_neuron_spiked(tick, NeuronId(neuron as u32))?;
                report.post_spikes += 1;
            }
        }

        // Pre-synaptic rows
        for source in sources.iter_mut().filter(|s| s.next_spike == tick) {
            match core.on_spike_received(tick, &mut source.row)? {
                RowOutcome::Processed { .. } => report.rows_delivered += 1,
                RowOutcome::Dropped { synapses } => {
                    debug!("Row of {} synapses dropped at tick {}", synapses, tick);
                    report.rows_dropped += 1;
                }
                RowOutcome::Rejected { error } => {
                    debug!("Row rejected at tick {}: {}", tick, error);
                    report.rows_rejected += 1;
                }
            }
            let n = source.row[2] as usize;
            for &control in &source.row[3 + n..3 + 2 * n] {
                if post_rng.next_u32() < coupling_threshold {
                    let delay = layout.delay(control);
                    pending.push((tick + delay + params.lag.max(1), layout.index(control)));
                }
            }
            source.next_spike = tick + next_interval(&isi, &mut isi_rng)?;
        }
    }

    report.stats = core.stats()?;
    report.rows = sources.into_iter().map(|s| s.row).collect();
    Ok(report)
}
