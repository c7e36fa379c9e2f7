// src/common/cpf.rs

/// Remove tudo que não for dígito (pontos, traços, espaços).
pub fn normalize(cpf: &str) -> String {
    cpf.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Valida o dígito verificador de um CPF brasileiro.
///
/// Espera o CPF já normalizado (11 dígitos). Sequências com todos os
/// dígitos iguais são inválidas mesmo com verificador "correto".
pub fn is_valid(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || cpf.len() != 11 {
        return false;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let check = |len: usize| -> u32 {
        let weight_start = (len + 1) as u32;
        let soma: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, &d)| d * (weight_start - i as u32))
            .sum();
        let resto = (soma * 10) % 11;
        if resto == 10 { 0 } else { resto }
    };

    check(9) == digits[9] && check(10) == digits[10]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aceita_cpf_valido() {
        assert!(is_valid("52998224725"));
        assert!(is_valid("11144477735"));
    }

    #[test]
    fn normaliza_mascara() {
        assert_eq!(normalize("529.982.247-25"), "52998224725");
        assert!(is_valid(&normalize("529.982.247-25")));
    }

    #[test]
    fn rejeita_digito_verificador_errado() {
        assert!(!is_valid("52998224724"));
        assert!(!is_valid("11144477734"));
    }

    #[test]
    fn rejeita_sequencias_repetidas() {
        assert!(!is_valid("11111111111"));
        assert!(!is_valid("00000000000"));
    }

    #[test]
    fn rejeita_tamanho_errado() {
        assert!(!is_valid(""));
        assert!(!is_valid("5299822472"));
        assert!(!is_valid("529982247255"));
    }
}
