use crate::cpu::State;
use crate::error::Result;
use sim86_instruction::{Address, AddressExpression, Register};

/// `bp` based expressions address the stack segment, everything else the data segment.
pub fn default_segment(expression: &AddressExpression) -> Register {
    match expression.base() {
        Some(Register::BP) => Register::SS,
        _ => Register::DS,
    }
}

/// The 16-bit offset of an expression: the displacement plus every scaled term, wrapped.
pub fn effective_offset(expression: &AddressExpression, state: &State) -> Result<u16> {
    let mut offset = expression.displacement.value();
    for term in expression.terms.iter().flatten() {
        offset = offset.wrapping_add((state.read(term.register)? as i32).wrapping_mul(term.scale));
    }

    Ok(offset as u16)
}

/// Resolve an expression to a segment:offset pair, using the explicit segment when the
/// expression carries one.
pub fn resolve(expression: &AddressExpression, state: &State) -> Result<Address> {
    let segment = expression
        .segment
        .unwrap_or_else(|| default_segment(expression));

    Ok(Address::new(
        state.register(segment),
        effective_offset(expression, state)?,
    ))
}

/// Physical address of an expression, masked to the width of the address space.
pub fn physical_address(expression: &AddressExpression, state: &State, mask: u32) -> Result<u32> {
    Ok(resolve(expression, state)?.flat() & mask)
}
