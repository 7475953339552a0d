use crate::error::{Error, Result};
use daggy::{Dag, EdgeIndex, NodeIndex, Walker};
use num_traits::Float;
use std::{collections::HashSet, fmt, str::FromStr};

pub type NeuronId = NodeIndex;
pub type ConnectionId = EdgeIndex;

pub(crate) fn constant<T: Float>(x: f64) -> T {
    T::from(x).expect("Unable to cast constant to T")
}

pub struct Neuron<T>
where
    T: Float + fmt::Display,
{
    value: T,
    bias_value: T,
    bias_weight: T,
    error: T,
}

impl<T> Neuron<T>
where
    T: Float + fmt::Display,
{
    pub fn new(value: T) -> Self {
        Neuron::with_bias(value, -T::one(), constant(0.5))
    }

    pub fn with_bias(value: T, bias_value: T, bias_weight: T) -> Self {
        Self {
            value,
            bias_value,
            bias_weight,
            error: T::zero(),
        }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn bias_value(&self) -> T {
        self.bias_value
    }

    pub fn bias_weight(&self) -> T {
        self.bias_weight
    }

    pub fn error(&self) -> T {
        self.error
    }

    /// Adds the bias term to `total`, squashes it through the sigmoid and
    /// stores the result as this neuron's value.
    ///
    /// Results above 0.9999 snap to exactly 1 and results below 0.0001 snap
    /// to exactly 0.
    fn activate(&mut self, total: T) -> T {
        let total = total + self.bias_value * self.bias_weight;
        let value = T::one() / (T::one() + (-total).exp());

        self.value = if value > constant(0.9999) {
            T::one()
        } else if value < constant(0.0001) {
            T::zero()
        } else {
            value
        };
        self.value
    }

    // `signal` is the residual for output neurons and the summed downstream
    // error for everything else.
    fn assign_error(&mut self, signal: T) -> T {
        self.error = self.value * (T::one() - self.value) * signal;
        self.error
    }

    fn update_weight(&mut self, learning_rate: T) {
        self.bias_weight = self.bias_weight + learning_rate * self.bias_value * self.error;
    }
}

impl<T> Default for Neuron<T>
where
    T: Float + fmt::Display,
{
    fn default() -> Self {
        Neuron::new(T::zero())
    }
}

impl<T> fmt::Display for Neuron<T>
where
    T: Float + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Neuron {{ value: {:.4}, error: {:.4}, bias: {:.4} * {:.4} }}",
            self.value, self.error, self.bias_value, self.bias_weight
        )
    }
}

pub struct Connection<T>
where
    T: Float + fmt::Display,
{
    weight: T,
}

impl<T> Connection<T>
where
    T: Float + fmt::Display,
{
    pub fn new(weight: T) -> Self {
        Self { weight }
    }

    pub fn weight(&self) -> T {
        self.weight
    }

    fn update_weight(&mut self, learning_rate: T, input_value: T, output_error: T) {
        self.weight = self.weight + learning_rate * input_value * output_error;
    }
}

impl<T> Default for Connection<T>
where
    T: Float + fmt::Display,
{
    fn default() -> Self {
        Connection::new(constant(0.5))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Input,
    Hidden,
    Output,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [LayerKind::Input, LayerKind::Hidden, LayerKind::Output];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Input => "input",
            LayerKind::Hidden => "hidden",
            LayerKind::Output => "output",
        }
    }

    fn position(&self) -> usize {
        match self {
            LayerKind::Input => 0,
            LayerKind::Hidden => 1,
            LayerKind::Output => 2,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        LayerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

/// Neurons of one layer, in the order they were added. That order is the
/// positional index used to match input values and output values.
pub struct Layer {
    kind: LayerKind,
    neurons: Vec<NeuronId>,
}

impl Layer {
    fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            neurons: Vec::new(),
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn neurons(&self) -> &[NeuronId] {
        &self.neurons
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn contains(&self, id: NeuronId) -> bool {
        self.neurons.contains(&id)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConnectionRef<T> {
    pub id: ConnectionId,
    pub source: NeuronId,
    pub target: NeuronId,
    pub weight: T,
}

// Neurons are the nodes and connections the edges of the DAG. A neuron's
// input connections are its incoming edges, its output connections the
// outgoing ones. Nothing is ever removed, so indices stay stable.
pub struct Network<T = f64>
where
    T: Float + fmt::Display,
{
    graph: Dag<Neuron<T>, Connection<T>>,
    layers: [Layer; 3],
}

impl<T> Network<T>
where
    T: Float + fmt::Display,
{
    pub fn new() -> Self {
        Self {
            graph: Dag::new(),
            layers: LayerKind::ALL.map(Layer::new),
        }
    }

    // Looks a layer up by name ("input", "hidden" or "output"). Unknown names
    // yield None.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        name.parse().ok().map(|kind| self.layer_of(kind))
    }

    pub fn layer_of(&self, kind: LayerKind) -> &Layer {
        &self.layers[kind.position()]
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn neurons_from_layer(&self, kind: LayerKind) -> &[NeuronId] {
        self.layer_of(kind).neurons()
    }

    // Stores `neuron` in the network and appends it to the `kind` layer.
    pub fn add_neuron(&mut self, kind: LayerKind, neuron: Neuron<T>) -> NeuronId {
        let id = self.graph.add_node(neuron);
        self.layers[kind.position()].neurons.push(id);
        id
    }

    /// Appends an already stored neuron to the `kind` layer unless it is
    /// there already. Returns whether the layer changed.
    pub fn attach(&mut self, kind: LayerKind, id: NeuronId) -> Result<bool> {
        self.neuron(id)?;

        let layer = &mut self.layers[kind.position()];
        if layer.contains(id) {
            return Ok(false);
        }
        layer.neurons.push(id);
        Ok(true)
    }

    /// Every neuron, layer by layer, in layer order.
    pub fn all_neurons(&self) -> Vec<NeuronId> {
        self.layers
            .iter()
            .flat_map(|layer| layer.neurons.iter().copied())
            .collect()
    }

    /// Every connection reachable from a layered neuron, each once, in the
    /// order they are discovered: per neuron, inputs first, then outputs.
    pub fn all_connections(&self) -> Vec<ConnectionId> {
        let mut seen = HashSet::new();
        let mut connections = Vec::new();

        for id in self.all_neurons() {
            let incoming = self.incoming(id).into_iter();
            let outgoing = self.outgoing(id).into_iter();
            for (edge, _) in incoming.chain(outgoing) {
                if seen.insert(edge) {
                    connections.push(edge);
                }
            }
        }
        connections
    }

    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn neuron(&self, id: NeuronId) -> Result<&Neuron<T>> {
        self.graph
            .node_weight(id)
            .ok_or(Error::UnknownNeuron(id.index()))
    }

    fn neuron_mut(&mut self, id: NeuronId) -> Result<&mut Neuron<T>> {
        self.graph
            .node_weight_mut(id)
            .ok_or(Error::UnknownNeuron(id.index()))
    }

    pub fn connection(&self, id: ConnectionId) -> Result<ConnectionRef<T>> {
        let (source, target) = self
            .graph
            .edge_endpoints(id)
            .ok_or(Error::UnknownConnection(id.index()))?;
        let weight = self.graph[id].weight;

        Ok(ConnectionRef {
            id,
            source,
            target,
            weight,
        })
    }

    // Input neurons are fed through here every step.
    pub fn set_value(&mut self, id: NeuronId, value: T) -> Result<()> {
        self.neuron_mut(id)?.value = value;
        Ok(())
    }

    pub fn set_weight(&mut self, id: ConnectionId, weight: T) -> Result<()> {
        self.graph
            .edge_weight_mut(id)
            .ok_or(Error::UnknownConnection(id.index()))?
            .weight = weight;
        Ok(())
    }

    /// Connects `from` to `to` with the default weight. Connecting an already
    /// connected pair is a no-op that returns the existing connection.
    pub fn add_output_connection(&mut self, from: NeuronId, to: NeuronId) -> Result<ConnectionId> {
        self.neuron(from)?;
        self.neuron(to)?;

        if let Some(existing) = self.graph.find_edge(from, to) {
            return Ok(existing);
        }
        self.graph
            .add_edge(from, to, Connection::default())
            .map_err(|_| Error::WouldCycle {
                from: from.index(),
                to: to.index(),
            })
    }

    // Same as add_output_connection(from, to), seen from the receiving end.
    pub fn add_input_connection(&mut self, to: NeuronId, from: NeuronId) -> Result<ConnectionId> {
        self.add_output_connection(from, to)
    }

    pub fn input_connections(&self, id: NeuronId) -> Result<Vec<ConnectionId>> {
        self.neuron(id)?;
        Ok(self.incoming(id).into_iter().map(|(edge, _)| edge).collect())
    }

    pub fn output_connections(&self, id: NeuronId) -> Result<Vec<ConnectionId>> {
        self.neuron(id)?;
        Ok(self.outgoing(id).into_iter().map(|(edge, _)| edge).collect())
    }

    // daggy walkers yield the newest edge first, reverse to get insertion order.
    fn incoming(&self, id: NeuronId) -> Vec<(ConnectionId, NeuronId)> {
        let mut edges: Vec<_> = self.graph.parents(id).iter(&self.graph).collect();
        edges.reverse();
        edges
    }

    fn outgoing(&self, id: NeuronId) -> Vec<(ConnectionId, NeuronId)> {
        let mut edges: Vec<_> = self.graph.children(id).iter(&self.graph).collect();
        edges.reverse();
        edges
    }

    /// Forward pass for one neuron.
    ///
    /// A neuron without input connections returns its assigned value as is.
    /// Any other neuron recursively evaluates every upstream neuron, weighs
    /// their outputs, adds its bias term and stores the sigmoid of the total.
    /// Nothing is memoized: each call re-evaluates the whole upstream graph.
    pub fn calculate_output(&mut self, id: NeuronId) -> Result<T> {
        let incoming = {
            self.neuron(id)?;
            self.incoming(id)
        };

        if incoming.is_empty() {
            return Ok(self.neuron(id)?.value);
        }

        let mut total = T::zero();
        for (edge, source) in incoming {
            let upstream = self.calculate_output(source)?;
            total = total + upstream * self.graph[edge].weight;
        }

        Ok(self.neuron_mut(id)?.activate(total))
    }

    /// Backward pass for one neuron.
    ///
    /// A neuron without output connections takes `value * (1 - value)` times
    /// its residual against `desired`. Any other neuron recursively computes
    /// the error of every downstream neuron, with the same `desired`, and
    /// takes `value * (1 - value)` times their plain sum. A neuron reached
    /// along several paths is recomputed each time and keeps the last result.
    pub fn calculate_error(&mut self, id: NeuronId, desired: T) -> Result<T> {
        let outgoing = {
            self.neuron(id)?;
            self.outgoing(id)
        };

        let signal = if outgoing.is_empty() {
            desired - self.neuron(id)?.value
        } else {
            let mut downstream = T::zero();
            for (_, target) in outgoing {
                downstream = downstream + self.calculate_error(target, desired)?;
            }
            downstream
        };

        Ok(self.neuron_mut(id)?.assign_error(signal))
    }

    /// `weight += learning_rate * source.value * target.error`. Only valid
    /// once both the forward and the error pass of the step are complete.
    pub fn update_connection_weight(&mut self, id: ConnectionId, learning_rate: T) -> Result<()> {
        let (source, target) = self
            .graph
            .edge_endpoints(id)
            .ok_or(Error::UnknownConnection(id.index()))?;
        let input_value = self.neuron(source)?.value;
        let output_error = self.neuron(target)?.error;

        self.graph[id].update_weight(learning_rate, input_value, output_error);
        Ok(())
    }

    /// `bias_weight += learning_rate * bias_value * error`.
    pub fn update_bias_weight(&mut self, id: NeuronId, learning_rate: T) -> Result<()> {
        self.neuron_mut(id)?.update_weight(learning_rate);
        Ok(())
    }
}

impl<T> Default for Network<T>
where
    T: Float + fmt::Display,
{
    fn default() -> Self {
        Network::new()
    }
}
