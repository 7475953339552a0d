use feedforward::{LayerKind, NetworkBuilder, Session, SumTask, Trainer, TrainingConfig};

#[test]
fn one_step_moves_output_closer_to_target() {
    let mut network = NetworkBuilder::build_simple::<f64>(2, 10, 1).unwrap();
    let trainer = Trainer::new(0.1);

    let before = trainer.run(&mut network, &[0.3, 0.4]).unwrap()[0];
    trainer.train(&mut network, &[0.3, 0.4], &[0.7]).unwrap();
    let after = trainer.run(&mut network, &[0.3, 0.4]).unwrap()[0];

    assert!((after - 0.7).abs() < (before - 0.7).abs());
    assert!(after > 0.7);
}

#[test]
fn training_from_the_same_seed_is_bit_reproducible() {
    let train = |seed: u64| {
        let mut network = NetworkBuilder::build_simple::<f64>(2, 10, 1).unwrap();
        let trainer = Trainer::new(0.1);
        for sample in SumTask::new(seed).take(1000) {
            trainer
                .train(&mut network, &sample.inputs, &sample.desired)
                .unwrap();
        }
        network.snapshot().unwrap()
    };

    let first = train(11);
    let second = train(11);

    let bits = |weights: Vec<f64>| weights.into_iter().map(f64::to_bits).collect::<Vec<_>>();
    assert_eq!(
        bits(first.connections.iter().map(|c| c.weight).collect()),
        bits(second.connections.iter().map(|c| c.weight).collect())
    );
    assert_eq!(
        bits(first.neurons.iter().map(|n| n.bias_weight).collect()),
        bits(second.neurons.iter().map(|n| n.bias_weight).collect())
    );
    assert_ne!(first, train(12));
}

#[test]
fn session_matches_manual_loop() {
    let config = TrainingConfig {
        steps: 500,
        report_every: 500,
        seed: 5,
        ..Default::default()
    };
    let mut session = Session::new(config).unwrap();
    session.run().unwrap();

    let mut network = NetworkBuilder::build_simple::<f64>(2, 10, 1).unwrap();
    let trainer = Trainer::new(0.1);
    for sample in SumTask::new(5).take(500) {
        trainer
            .train(&mut network, &sample.inputs, &sample.desired)
            .unwrap();
    }

    // The probe evaluation overwrites neuron values, so compare learned state only.
    let ours = session.network().snapshot().unwrap();
    let theirs = network.snapshot().unwrap();
    assert_eq!(ours.connections, theirs.connections);
    for (a, b) in ours.neurons.iter().zip(&theirs.neurons) {
        assert_eq!(a.bias_weight.to_bits(), b.bias_weight.to_bits());
    }
}

#[test]
fn long_training_keeps_outputs_in_range() {
    let config = TrainingConfig {
        steps: 5_000,
        report_every: 1_000,
        seed: 1,
        probe: vec![0.2, 0.3],
        ..Default::default()
    };
    let mut session = Session::new(config).unwrap();
    let evaluations = session.run().unwrap();
    assert_eq!(evaluations.len(), 5);

    for evaluation in &evaluations {
        let output = evaluation.outputs[0];
        assert!(output.is_finite());
        assert!((0.0..=1.0).contains(&output));
    }

    let network = session.into_network();
    assert_eq!(network.neurons_from_layer(LayerKind::Hidden).len(), 10);
    for id in network.all_connections() {
        assert!(network.connection(id).unwrap().weight.is_finite());
    }
}
