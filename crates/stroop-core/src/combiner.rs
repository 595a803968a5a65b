use crate::binding::{Binding, CircularConvolution};
use crate::error::Result;
use crate::state::ChannelState;
use crate::vector::SemanticPointer;
use crate::vocabulary::Vocabulary;

/// Combines word and color evidence into one vector.
///
/// Each channel is tagged with its role (`COLOR ⊛ color + WORD ⊛ word`), then
/// the sum is unbound by the attention vector. Roles are recovered in
/// proportion to their attention weight, so the attended role dominates the
/// evidence. Whether the result has memory depends on the channel state.
#[derive(Clone, Debug)]
pub struct WorkingMemory<B: Binding = CircularConvolution> {
    binding: B,
    color_role: SemanticPointer,
    word_role: SemanticPointer,
    pub gain: f64,
    state: ChannelState,
}

impl WorkingMemory<CircularConvolution> {
    pub fn new(vocab: &Vocabulary, gain: f64, state: ChannelState) -> Result<Self> {
        Self::with_binding(CircularConvolution, vocab, gain, state)
    }
}

impl<B: Binding> WorkingMemory<B> {
    pub fn with_binding(
        binding: B,
        vocab: &Vocabulary,
        gain: f64,
        state: ChannelState,
    ) -> Result<Self> {
        Ok(Self {
            binding,
            color_role: vocab.get("COLOR")?.clone(),
            word_role: vocab.get("WORD")?.clone(),
            gain,
            state,
        })
    }

    /// Instantaneous evidence before the channel dynamics.
    pub fn combine(
        &self,
        color: &SemanticPointer,
        word: &SemanticPointer,
        attention: &SemanticPointer,
    ) -> SemanticPointer {
        let tagged = &self.binding.bind(&self.color_role, color)
            + &self.binding.bind(&self.word_role, word);
        &self.binding.unbind(attention, &tagged) * self.gain
    }

    pub fn step(
        &mut self,
        color: &SemanticPointer,
        word: &SemanticPointer,
        attention: &SemanticPointer,
        dt: f64,
    ) -> &SemanticPointer {
        let input = self.combine(color, word, attention);
        self.state.step(&input, dt)
    }

    pub fn output(&self) -> &SemanticPointer {
        self.state.output()
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}
