use crate::table::{Shape, ENCODINGS};
use crate::{decode_instruction, encode, try_decode, DecodeError, Encoding};
use sim_instruction::{
    AddressingMode, Displacement, Form, Immediate, MemoryAccess, Mnemonic, Operand, OperandSize,
    Register, RegisterAccess,
};

/// Bytes that follow the op code (and mod/reg/rm byte) of the smallest instruction for `encoding`.
fn minimal_tail(encoding: &Encoding) -> usize {
    match encoding.shape {
        Shape::RegMemWithRegister => 0,
        Shape::ImmediateToRegMem
        | Shape::ImmediateToAccumulator
        | Shape::ImmediateToRegister
        | Shape::Branch => 1,
    }
}

fn has_mrrm(shape: Shape) -> bool {
    matches!(shape, Shape::RegMemWithRegister | Shape::ImmediateToRegMem)
}

/// Every first byte accepted by the primary condition of `encoding`.
fn first_bytes(encoding: &Encoding) -> impl Iterator<Item = u8> + '_ {
    (0..=0xFF_u8).filter(move |byte| encoding.primary.matches(*byte))
}

#[test]
fn minimal_sequence_for_every_encoding() {
    for encoding in ENCODINGS {
        let mut bytes = vec![encoding.primary.bits()];
        if has_mrrm(encoding.shape) {
            // mod 00, r/m 000: [bx + si], no displacement.
            bytes.push(encoding.secondary.bits());
        }
        bytes.extend(std::iter::repeat(0x01).take(minimal_tail(encoding)));
        let expected = bytes.clone();

        // Something undecodable in front and behind, to check the address and that nothing
        // extra is consumed.
        let mut memory = vec![0xF1];
        memory.extend(&bytes);
        memory.push(0xF1);

        let instruction = decode_instruction(&memory, 1).unwrap();
        assert_eq!(instruction.mnemonic, encoding.mnemonic);
        assert_eq!(Shape::from(instruction.form), encoding.shape);
        assert_eq!(instruction.address, 1);
        assert_eq!(instruction.bytes, expected, "{}", instruction);
        assert_eq!(instruction.next_address(), 1 + expected.len());
    }
}

#[test]
fn encode_reproduces_decoded_bytes() {
    // Long enough for a word displacement followed by a word immediate.
    let tail = [0x34, 0x12, 0x78, 0x56];

    for encoding in ENCODINGS {
        for first in first_bytes(encoding) {
            let seconds: Vec<u8> = if has_mrrm(encoding.shape) {
                (0..=0xFF_u8)
                    .filter(|byte| encoding.secondary.matches(*byte))
                    .collect()
            } else {
                vec![0x56]
            };

            for second in seconds {
                let mut memory = vec![first, second];
                memory.extend(tail);

                let instruction = decode_instruction(&memory, 0).unwrap();
                let mut expected = instruction.bytes.clone();

                // 0x82 (S set on a byte operation) is an alias of 0x80 and is written back as
                // 0x80.
                if encoding.shape == Shape::ImmediateToRegMem
                    && encoding.s.read(first) != 0
                    && encoding.w.read(first) == 0
                {
                    expected[0] &= !0x02;
                }

                assert_eq!(
                    encode(&instruction),
                    Ok(expected),
                    "{:02x} {:02x}: {}",
                    first,
                    second,
                    instruction
                );
            }
        }
    }
}

#[test]
fn scenario_decodes() {
    let memory = [0xB8, 0x05, 0x00, 0x05, 0x02, 0x00, 0x3D, 0x00, 0x00];

    let mov = decode_instruction(&memory, 0).unwrap();
    assert_eq!(mov.to_string(), "mov ax, 5");
    assert_eq!(mov.form, Form::ImmediateToRegister);

    let add = decode_instruction(&memory, mov.next_address()).unwrap();
    assert_eq!(add.to_string(), "add ax, 2");
    assert_eq!(add.form, Form::ImmediateToAccumulator);
    assert_eq!(add.address, 3);

    let cmp = decode_instruction(&memory, add.next_address()).unwrap();
    assert_eq!(cmp.to_string(), "cmp ax, 0");
    assert_eq!(cmp.next_address(), memory.len());

    assert_eq!(
        decode_instruction(&memory, cmp.next_address()),
        Err(DecodeError::AddressOutOfRange(memory.len()))
    );
}

#[test]
fn based_memory_operand() {
    let instruction = decode_instruction(&[0x8B, 0x5B, 0x0A], 0).unwrap();
    assert_eq!(instruction.mnemonic, Mnemonic::MOV);
    assert_eq!(
        instruction.destination,
        Operand::Register(RegisterAccess::word(Register::BlBx))
    );
    assert_eq!(
        instruction.source,
        Operand::Memory(MemoryAccess::based(
            AddressingMode::BpDi,
            Displacement::Byte(10),
            OperandSize::Word
        ))
    );
    assert_eq!(instruction.to_string(), "mov bx, [bp + di + 10]");
}

#[test]
fn sign_extended_immediate() {
    let instruction = decode_instruction(&[0x83, 0xC0, 0x02], 0).unwrap();
    assert_eq!(instruction.to_string(), "add ax, 2");
    assert_eq!(
        instruction.source,
        Operand::Immediate(Immediate::SignExtended(2))
    );
    assert_eq!(instruction.len(), 3);
}

#[test]
fn undecodable() {
    assert_eq!(
        decode_instruction(&[0x90, 0xF1], 1),
        Err(DecodeError::InvalidOpCode {
            op_code: 0xF1,
            address: 1
        })
    );
    // The group selector 001 (or) is not part of the subset.
    assert_eq!(
        decode_instruction(&[0x83, 0xC8, 0x01], 0),
        Err(DecodeError::InvalidOpCode {
            op_code: 0x83,
            address: 0
        })
    );
    // Truncated displacement.
    assert_eq!(
        decode_instruction(&[0x8B, 0x9B, 0x0A], 0),
        Err(DecodeError::CouldNotReadExtraBytes { address: 0 })
    );
    assert_eq!(try_decode(&[], 0), None);
    assert_eq!(try_decode(&[0x74], 0), None);
}
