use crate::engine::{constant, LayerKind, Network, Neuron};
use crate::error::{Error, Result};
use num_traits::Float;
use std::fmt;

pub struct NetworkBuilder;

impl NetworkBuilder {
    // Every input neuron feeds every hidden neuron and every hidden neuron
    // feeds every output neuron. No skip or intra-layer connections.
    pub fn build_simple<T>(inputs: usize, hidden: usize, outputs: usize) -> Result<Network<T>>
    where
        T: Float + fmt::Display,
    {
        let sizes = [
            (LayerKind::Input, inputs),
            (LayerKind::Hidden, hidden),
            (LayerKind::Output, outputs),
        ];

        let mut network = Network::new();
        for (kind, size) in sizes {
            if size == 0 {
                return Err(Error::EmptyLayer(kind));
            }
            for _ in 0..size {
                network.add_neuron(kind, Neuron::default());
            }
        }

        for (from, to) in [
            (LayerKind::Input, LayerKind::Hidden),
            (LayerKind::Hidden, LayerKind::Output),
        ] {
            let sources = network.neurons_from_layer(from).to_vec();
            let targets = network.neurons_from_layer(to).to_vec();
            for &source in &sources {
                for &target in &targets {
                    network.add_output_connection(source, target)?;
                }
            }
        }

        log::debug!(
            "built {}-{}-{} network with {} connections",
            inputs,
            hidden,
            outputs,
            network.connection_count()
        );
        Ok(network)
    }
}

pub struct Trainer<T = f64>
where
    T: Float + fmt::Display,
{
    learning_rate: T,
}

impl<T> Trainer<T>
where
    T: Float + fmt::Display,
{
    pub fn new(learning_rate: T) -> Self {
        Self { learning_rate }
    }

    pub fn learning_rate(&self) -> T {
        self.learning_rate
    }

    /// One online training step.
    ///
    /// The phases never interleave: inputs are assigned, every output neuron
    /// is evaluated, errors are propagated starting from every input neuron
    /// against `desired[0]`, then every connection weight and finally every
    /// bias weight is updated. Desired values past the first are ignored.
    pub fn train(&self, network: &mut Network<T>, inputs: &[T], desired: &[T]) -> Result<()> {
        self.train_with_rate(network, inputs, desired, self.learning_rate)
    }

    // Same as `train`, with a learning rate for this step only.
    pub fn train_with_rate(
        &self,
        network: &mut Network<T>,
        inputs: &[T],
        desired: &[T],
        learning_rate: T,
    ) -> Result<()> {
        let target = *desired.first().ok_or(Error::MissingDesiredOutput)?;
        self.forward(network, inputs)?;

        for id in network.neurons_from_layer(LayerKind::Input).to_vec() {
            network.calculate_error(id, target)?;
        }

        for id in network.all_connections() {
            network.update_connection_weight(id, learning_rate)?;
        }
        for id in network.all_neurons() {
            network.update_bias_weight(id, learning_rate)?;
        }

        log::trace!("trained on {} against {}", Values(inputs), target);
        Ok(())
    }

    /// Forward pass only. Returns one value per output neuron, in layer
    /// order, and leaves every weight untouched.
    pub fn run(&self, network: &mut Network<T>, inputs: &[T]) -> Result<Vec<T>> {
        let outputs = self.forward(network, inputs)?;
        log::trace!("{} : {}", Values(inputs), Values(&outputs));
        Ok(outputs)
    }

    fn forward(&self, network: &mut Network<T>, inputs: &[T]) -> Result<Vec<T>> {
        let input_layer = network.neurons_from_layer(LayerKind::Input).to_vec();
        if input_layer.is_empty() {
            return Err(Error::EmptyLayer(LayerKind::Input));
        }
        if inputs.len() != input_layer.len() {
            return Err(Error::InputShape {
                expected: input_layer.len(),
                actual: inputs.len(),
            });
        }
        let output_layer = network.neurons_from_layer(LayerKind::Output).to_vec();
        if output_layer.is_empty() {
            return Err(Error::EmptyLayer(LayerKind::Output));
        }

        for (&id, &value) in input_layer.iter().zip(inputs) {
            network.set_value(id, value)?;
        }

        output_layer
            .into_iter()
            .map(|id| network.calculate_output(id))
            .collect()
    }
}

impl<T> Default for Trainer<T>
where
    T: Float + fmt::Display,
{
    fn default() -> Self {
        Trainer::new(constant(0.5))
    }
}

struct Values<'a, T>(&'a [T]);

impl<T> fmt::Display for Values<'_, T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.4}", value)?;
        }
        write!(f, "]")
    }
}
