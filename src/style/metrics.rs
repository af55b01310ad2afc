//! Base-14 font metrics and WinAnsi encoding.
//!
//! Widths are in 1/1000 em, taken from the Adobe Core14 AFM files.

/// Helvetica advance widths for ASCII 0x20..=0x7E.
///
/// Index = (char as usize) - 32.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, // sp ! " # $ % & '
    333, 333, 389, 584, 278, 333, 278, 278, // ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, // 0-7
    556, 556, 278, 278, 584, 584, 584, 556, // 8 9 : ; < = > ?
    1015, 667, 667, 722, 722, 667, 611, 778, // @ A-G
    722, 278, 500, 667, 556, 833, 722, 778, // H-O
    667, 778, 722, 667, 611, 722, 667, 944, // P-W
    667, 667, 611, 278, 278, 278, 469, 556, // X Y Z [ \ ] ^ _
    333, 556, 556, 500, 556, 556, 278, 556, // ` a-g
    556, 222, 222, 500, 222, 833, 556, 556, // h-o
    556, 556, 333, 500, 278, 556, 500, 722, // p-w
    500, 500, 500, 334, 260, 334, 584, // x y z { | } ~
];

/// Helvetica advance widths for Latin-1 0xA0..=0xFF.
///
/// Index = (char as usize) - 0xA0.
const HELVETICA_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, // nbsp ¡ ¢ £ ¤ ¥ ¦ §
    333, 737, 370, 556, 584, 333, 737, 333, // ¨ © ª « ¬ shy ® ¯
    400, 584, 333, 333, 333, 556, 537, 278, // ° ± ² ³ ´ µ ¶ ·
    333, 333, 365, 556, 834, 834, 834, 611, // ¸ ¹ º » ¼ ½ ¾ ¿
    667, 667, 667, 667, 667, 667, 1000, 722, // À-Å Æ Ç
    667, 667, 667, 667, 278, 278, 278, 278, // È-Ë Ì-Ï
    722, 722, 778, 778, 778, 778, 778, 584, // Ð Ñ Ò-Ö ×
    778, 722, 722, 722, 722, 667, 667, 611, // Ø Ù-Ü Ý Þ ß
    556, 556, 556, 556, 556, 556, 889, 500, // à-å æ ç
    556, 556, 556, 556, 278, 278, 278, 278, // è-ë ì-ï
    556, 556, 556, 556, 556, 556, 556, 584, // ð ñ ò-ö ÷
    611, 556, 556, 556, 556, 500, 556, 500, // ø ù-ü ý þ ÿ
];

/// Width used for glyphs Helvetica does not cover.
const HELVETICA_DEFAULT: u16 = 556;

/// Courier is monospaced.
const COURIER_WIDTH: u16 = 600;

/// Helvetica advance width of a WinAnsi-encodable character.
pub(crate) fn helvetica_width(c: char) -> u16 {
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        return HELVETICA_ASCII[(code - 0x20) as usize];
    }
    if (0xA0..=0xFF).contains(&code) {
        return HELVETICA_LATIN1[(code - 0xA0) as usize];
    }
    match c {
        '…' | '—' | '‰' | '™' | 'Œ' => 1000,
        'œ' => 944,
        '–' | '€' | 'ƒ' | '†' | '‡' => 556,
        'Š' | 'Ÿ' => 667,
        'Ž' => 611,
        'š' | 'ž' => 500,
        '‘' | '’' | '‚' => 222,
        '“' | '”' | '„' | '‹' | '›' | 'ˆ' | '˜' => 333,
        '•' => 350,
        _ => HELVETICA_DEFAULT,
    }
}

/// Courier advance width.
pub(crate) fn courier_width(_c: char) -> u16 {
    COURIER_WIDTH
}

/// Encode a character in WinAnsiEncoding (Windows-1252).
pub(crate) fn winansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => {
            let byte = match c {
                '€' => 0x80,
                '‚' => 0x82,
                'ƒ' => 0x83,
                '„' => 0x84,
                '…' => 0x85,
                '†' => 0x86,
                '‡' => 0x87,
                'ˆ' => 0x88,
                '‰' => 0x89,
                'Š' => 0x8A,
                '‹' => 0x8B,
                'Œ' => 0x8C,
                'Ž' => 0x8E,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '˜' => 0x98,
                '™' => 0x99,
                'š' => 0x9A,
                '›' => 0x9B,
                'œ' => 0x9C,
                'ž' => 0x9E,
                'Ÿ' => 0x9F,
                _ => return None,
            };
            Some(byte)
        }
    }
}
