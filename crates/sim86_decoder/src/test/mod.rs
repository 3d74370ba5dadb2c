use crate::{decode_instruction, DecodeError, Decoder};
use sim86_instruction::{
    AddressExpression, AddressingMode, Displacement, Immediate, Instruction, Operand, OperandSize,
    Operation, Register, RegisterAccess,
};

macro_rules! test_decoder {
    ($bytes:expr,$expected:literal) => {{
        let bytes: &[u8] = &$bytes;
        let instruction = decode_instruction(bytes, 0).unwrap();
        assert_eq!($expected, instruction.to_string());
        assert_eq!(bytes.len(), instruction.size, "size of {}", $expected);
    }};
}

fn listing(bytes: &[u8]) -> Vec<String> {
    Decoder::new(bytes)
        .map(|result| result.unwrap().1.to_string())
        .collect()
}

#[test]
fn register_to_register_mov() {
    test_decoder!([0x89, 0xD9], "mov cx, bx");
    test_decoder!([0x88, 0xE5], "mov ch, ah");
    test_decoder!([0x8B, 0xDE], "mov bx, si");

    let instruction = decode_instruction(&[0x89, 0xD9], 0).unwrap();
    assert_eq!(
        Instruction::new(
            Operation::MOV,
            [
                RegisterAccess::word(Register::C).into(),
                RegisterAccess::word(Register::B).into(),
            ],
            OperandSize::Word,
            2,
        ),
        instruction
    );
}

#[test]
fn immediate_to_register() {
    test_decoder!([0xB8, 0x01, 0x00], "mov ax, 1");
    test_decoder!([0xB1, 0x0C], "mov cl, 12");
    test_decoder!([0xB5, 0xF4], "mov ch, 244");
    test_decoder!([0xBA, 0x6C, 0x0F], "mov dx, 3948");
    test_decoder!([0xBA, 0x94, 0xF0], "mov dx, 61588");
}

#[test]
fn memory_operands() {
    test_decoder!([0x8B, 0x56, 0x00], "mov dx, [bp + 0]");
    test_decoder!([0x8A, 0x00], "mov al, [bx + si]");
    test_decoder!([0x8B, 0x1B], "mov bx, [bp + di]");
    test_decoder!([0x8A, 0x60, 0x04], "mov ah, [bx + si + 4]");
    test_decoder!([0x8A, 0x80, 0x87, 0x13], "mov al, [bx + si + 4999]");
    test_decoder!([0x89, 0x09], "mov [bx + di], cx");
    test_decoder!([0x88, 0x0A], "mov [bp + si], cl");
    test_decoder!([0x8B, 0x41, 0xDB], "mov ax, [bx + di - 37]");
    test_decoder!([0x89, 0x8C, 0xD4, 0xFE], "mov [si - 300], cx");
    test_decoder!([0x8B, 0x2E, 0x05, 0x00], "mov bp, [5]");
    test_decoder!([0x8B, 0x1E, 0x82, 0x0D], "mov bx, [3458]");
}

#[test]
fn direct_address_accumulator() {
    test_decoder!([0xA1, 0x00, 0x01], "mov ax, [256]");
    test_decoder!([0xA0, 0x10, 0x00], "mov al, [16]");
    test_decoder!([0xA3, 0xFB, 0x09], "mov [2555], ax");
    test_decoder!([0xA2, 0x0F, 0x00], "mov [15], al");
}

#[test]
fn immediate_to_memory() {
    test_decoder!([0xC6, 0x03, 0x07], "mov byte [bp + di], 7");
    test_decoder!(
        [0xC7, 0x85, 0x85, 0x03, 0x5B, 0x01],
        "mov word [di + 901], 347"
    );

    assert_eq!(
        Err(DecodeError::UnknownOpcode {
            op_code: 0xC6,
            offset: 0
        }),
        decode_instruction(&[0xC6, 0x08, 0x07], 0)
    );
}

#[test]
fn segment_registers() {
    test_decoder!([0x8E, 0xD8], "mov ds, ax");
    test_decoder!([0x8C, 0xC3], "mov bx, es");
    test_decoder!([0x8E, 0x17], "mov ss, [bx]");
    test_decoder!([0x8C, 0x4E, 0x02], "mov [bp + 2], cs");

    assert!(decode_instruction(&[0x8E, 0xE0], 0).is_err());
}

#[test]
fn arithmetic() {
    test_decoder!([0x03, 0x18], "add bx, [bx + si]");
    test_decoder!([0x01, 0xD8], "add ax, bx");
    test_decoder!([0x00, 0xE0], "add al, ah");
    test_decoder!([0x83, 0xC6, 0x02], "add si, 2");
    test_decoder!([0x83, 0xC5, 0x02], "add bp, 2");
    test_decoder!([0x80, 0x07, 0x22], "add byte [bx], 34");
    test_decoder!([0x83, 0x82, 0xE8, 0x03, 0x1D], "add word [bp + si + 1000], 29");
    test_decoder!([0x05, 0xE8, 0x03], "add ax, 1000");
    test_decoder!([0x04, 0xE2], "add al, 226");
    test_decoder!([0x2B, 0x18], "sub bx, [bx + si]");
    test_decoder!([0x83, 0xEE, 0x02], "sub si, 2");
    test_decoder!([0x80, 0x2F, 0x22], "sub byte [bx], 34");
    test_decoder!([0x2C, 0x09], "sub al, 9");
    test_decoder!([0x39, 0xD8], "cmp ax, bx");
    test_decoder!([0x83, 0x3E, 0xE2, 0x12, 0x1D], "cmp word [4834], 29");
    test_decoder!([0x3D, 0xE8, 0x03], "cmp ax, 1000");
    test_decoder!([0x12, 0xC4], "adc al, ah");
    test_decoder!([0x1B, 0xC3], "sbb ax, bx");
}

#[test]
fn sign_extended_immediates() {
    test_decoder!([0x83, 0xC0, 0xFD], "add ax, -3");
    test_decoder!([0x81, 0xC0, 0xFD, 0xFF], "add ax, 65533");
    test_decoder!([0x80, 0xC1, 0xFD], "add cl, 253");
}

#[test]
fn logic() {
    test_decoder!([0x20, 0xE0], "and al, ah");
    test_decoder!([0x24, 0x5D], "and al, 93");
    test_decoder!([0x08, 0xE0], "or al, ah");
    test_decoder!([0x81, 0xCB, 0x00, 0xF0], "or bx, 61440");
    test_decoder!([0x31, 0xC0], "xor ax, ax");
    test_decoder!([0x34, 0x06], "xor al, 6");
    test_decoder!([0x85, 0xCB], "test bx, cx");
    test_decoder!([0x84, 0x06, 0x00, 0x01], "test [256], al");
    test_decoder!([0xA8, 0x01], "test al, 1");
    test_decoder!([0xF6, 0xC3, 0x01], "test bl, 1");
    test_decoder!([0xF7, 0x07, 0x34, 0x12], "test word [bx], 4660");
    test_decoder!([0xF6, 0xD0], "not al");
    test_decoder!([0xF7, 0x16, 0x00, 0x01], "not word [256]");
}

#[test]
fn increment_and_decrement() {
    test_decoder!([0x40], "inc ax");
    test_decoder!([0x47], "inc di");
    test_decoder!([0x4B], "dec bx");
    test_decoder!([0xFE, 0xC4], "inc ah");
    test_decoder!([0xFE, 0x04], "inc byte [si]");
    test_decoder!([0xFF, 0x4E, 0x02], "dec word [bp + 2]");
    test_decoder!([0xF6, 0xDB], "neg bl");
    test_decoder!([0xF7, 0xE3], "mul bx");
    test_decoder!([0xF6, 0x2F], "imul byte [bx]");

    assert!(decode_instruction(&[0xFF, 0x16, 0x00, 0x00], 0).is_err());
    assert!(decode_instruction(&[0xF7, 0xF3], 0).is_err());
}

#[test]
fn shifts() {
    test_decoder!([0xD1, 0xE0], "shl ax, 1");
    test_decoder!([0xD2, 0xEB], "shr bl, cl");
    test_decoder!([0xD3, 0xF8], "sar ax, cl");
    test_decoder!([0xD1, 0xF0], "shl ax, 1");
    test_decoder!([0xD0, 0x27], "shl byte [bx], 1");
    test_decoder!([0xD3, 0x2F], "shr word [bx], cl");

    assert_eq!(
        Err(DecodeError::UnknownOpcode {
            op_code: 0xD1,
            offset: 0
        }),
        decode_instruction(&[0xD1, 0xC0], 0)
    );
}

#[test]
fn jumps() {
    test_decoder!([0x74, 0xFD], "jz -3");
    test_decoder!([0x75, 0x05], "jnz 5");
    test_decoder!([0x7C, 0xFE], "jl -2");
    test_decoder!([0x7E, 0x00], "jle 0");
    test_decoder!([0x72, 0x02], "jb 2");
    test_decoder!([0x76, 0x7F], "jbe 127");
    test_decoder!([0x7A, 0x80], "jp -128");
    test_decoder!([0x70, 0x01], "jo 1");
    test_decoder!([0x78, 0x01], "js 1");
    test_decoder!([0x7D, 0x01], "jge 1");
    test_decoder!([0x7F, 0x01], "jg 1");
    test_decoder!([0x73, 0x01], "jae 1");
    test_decoder!([0x77, 0x01], "ja 1");
    test_decoder!([0x7B, 0x01], "jnp 1");
    test_decoder!([0x71, 0x01], "jno 1");
    test_decoder!([0x79, 0x01], "jns 1");
    test_decoder!([0xE2, 0xFE], "loop -2");
    test_decoder!([0xE1, 0xFE], "loopz -2");
    test_decoder!([0xE0, 0xFE], "loopnz -2");
    test_decoder!([0xE3, 0x04], "jcxz 4");
    test_decoder!([0xEB, 0xFE], "jmp -2");
    test_decoder!([0xF4], "hlt");
}

#[test]
fn short_jump_target() {
    let mut data = vec![0x90; 10];
    data.extend_from_slice(&[0x74, 0xFD]);

    let instruction = decode_instruction(&data, 10).unwrap();
    assert_eq!(Operation::JZ, instruction.operation);
    assert_eq!(
        Operand::Immediate(Immediate::jump(-3)),
        *instruction.destination()
    );
    assert_eq!(Some(9), instruction.jump_target(10));
}

#[test]
fn segment_override_prefix() {
    test_decoder!([0x26, 0x8B, 0x07], "mov ax, es:[bx]");
    test_decoder!([0x2E, 0xA1, 0x00, 0x01], "mov ax, cs:[256]");
    test_decoder!([0x36, 0xC6, 0x06, 0x10, 0x00, 0x01], "mov byte ss:[16], 1");

    let instruction = decode_instruction(&[0x3E, 0x89, 0x46, 0x02], 0).unwrap();
    let mut expression = AddressExpression::indirect(AddressingMode::Bp, Displacement::Byte(2));
    expression.segment = Some(Register::DS);
    assert_eq!(Operand::Memory(expression), *instruction.destination());
    assert_eq!(4, instruction.size);

    // A prefix on an instruction without a memory operand only adds to the size.
    test_decoder!([0x26, 0x89, 0xD9], "mov cx, bx");
}

#[test]
fn long_prefix_runs_count_every_byte() {
    let mut data = vec![0x26; 256];
    data.push(0x40); // inc ax
    data.push(0x41); // inc cx

    let instruction = decode_instruction(&data, 0).unwrap();
    assert_eq!("inc ax", instruction.to_string());
    assert_eq!(257, instruction.size);

    let offsets: Vec<usize> = Decoder::new(&data)
        .map(|result| result.unwrap().0)
        .collect();
    assert_eq!(vec![0, 257], offsets);
}

#[test]
fn truncated_instructions() {
    assert_eq!(
        Err(DecodeError::TruncatedInstruction { offset: 1 }),
        decode_instruction(&[0x90, 0xB8, 0x01], 1)
    );
    assert_eq!(
        Err(DecodeError::TruncatedInstruction { offset: 0 }),
        decode_instruction(&[0x8B, 0x56], 0)
    );
    assert_eq!(
        Err(DecodeError::TruncatedInstruction { offset: 0 }),
        decode_instruction(&[0x26], 0)
    );
    assert_eq!(
        Err(DecodeError::EndOfInput { offset: 2 }),
        decode_instruction(&[0x89, 0xD9], 2)
    );
}

#[test]
fn unknown_op_code() {
    assert_eq!(
        Err(DecodeError::UnknownOpcode {
            op_code: 0x90,
            offset: 0
        }),
        decode_instruction(&[0x90], 0)
    );
    assert_eq!(
        Err(DecodeError::UnknownOpcode {
            op_code: 0x06,
            offset: 1
        }),
        decode_instruction(&[0x40, 0x26, 0x06], 1)
    );
}

#[test]
fn modrm_bytes_decode_to_their_fields() {
    test_decoder!([0x89, 0b11_011_001], "mov cx, bx");
    test_decoder!([0x8A, 0b01_010_010, 0x00], "mov dl, [bp + si + 0]");
}

#[test]
fn decoder_advances_by_instruction_size() {
    let data = [
        0xB9, 0x03, 0x00, // mov cx, 3
        0x26, 0x8B, 0x47, 0xFE, // mov ax, es:[bx - 2]
        0x83, 0xC3, 0x02, // add bx, 2
        0xE2, 0xF4, // loop -12
        0xF4, // hlt
    ];

    let offsets: Vec<usize> = Decoder::new(&data)
        .map(|result| result.unwrap().0)
        .collect();
    assert_eq!(vec![0, 3, 7, 10, 12], offsets);

    assert_eq!(
        vec![
            "mov cx, 3",
            "mov ax, es:[bx - 2]",
            "add bx, 2",
            "loop -12",
            "hlt"
        ],
        listing(&data)
    );

    let mut offset = 0;
    while offset < data.len() {
        let instruction = decode_instruction(&data, offset).unwrap();
        offset += instruction.size;
    }
    assert_eq!(data.len(), offset);
}

#[test]
fn decoder_stops_after_first_error() {
    let data = [0x40, 0x0F, 0x40];
    let mut decoder = Decoder::new(&data);

    assert!(matches!(decoder.next(), Some(Ok((0, _)))));
    assert_eq!(
        Some(Err(DecodeError::UnknownOpcode {
            op_code: 0x0F,
            offset: 1
        })),
        decoder.next()
    );
    assert_eq!(None, decoder.next());
}
